//! Action types and the action catalog
//!
//! Every [`ActionType`] is bound to one instruction template and one
//! [`OutputShape`]. The binding is a static table: adding an action means
//! adding a variant plus its [`ActionSpec`], nothing else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raised when an action identifier is not in the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

/// The closed set of text transformations a step can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Clean,
    Summarize,
    KeyPoints,
    Simplify,
    Analogy,
    Classify,
    Tone,
}

impl ActionType {
    pub const ALL: [ActionType; 7] = [
        ActionType::Clean,
        ActionType::Summarize,
        ActionType::KeyPoints,
        ActionType::Simplify,
        ActionType::Analogy,
        ActionType::Classify,
        ActionType::Tone,
    ];

    /// Canonical identifier used in workflow files and run records
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Clean => "clean",
            ActionType::Summarize => "summarize",
            ActionType::KeyPoints => "keypoints",
            ActionType::Simplify => "simplify",
            ActionType::Analogy => "analogy",
            ActionType::Classify => "classify",
            ActionType::Tone => "tone",
        }
    }

    /// Parse an identifier, ignoring case and surrounding whitespace.
    ///
    /// `examples`, `sentiment` and `key_points` are accepted as aliases of
    /// `analogy`, `tone` and `keypoints`.
    pub fn parse(id: &str) -> Result<Self, UnknownAction> {
        let action = match id.trim().to_ascii_lowercase().as_str() {
            "clean" => ActionType::Clean,
            "summarize" => ActionType::Summarize,
            "keypoints" | "key_points" => ActionType::KeyPoints,
            "simplify" => ActionType::Simplify,
            "analogy" | "examples" => ActionType::Analogy,
            "classify" => ActionType::Classify,
            "tone" | "sentiment" => ActionType::Tone,
            _ => return Err(UnknownAction(id.to_string())),
        };
        Ok(action)
    }

    /// The template and output shape bound to this action
    pub fn spec(self) -> &'static ActionSpec {
        match self {
            ActionType::Clean => &CLEAN,
            ActionType::Summarize => &SUMMARIZE,
            ActionType::KeyPoints => &KEY_POINTS,
            ActionType::Simplify => &SIMPLIFY,
            ActionType::Analogy => &ANALOGY,
            ActionType::Classify => &CLASSIFY,
            ActionType::Tone => &TONE,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Primitive type of a shape field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
}

impl FieldKind {
    /// Type name as written in prompts and violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::TextList => "array of strings",
        }
    }
}

/// A required field of an output shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// How the text handed to the next step is derived from a validated output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryText {
    /// The value of a single text field
    Field(&'static str),
    /// A list field rendered as `- item` lines
    Bullets(&'static str),
    /// Several text fields rendered as `Label: value` lines
    Labeled(&'static [(&'static str, &'static str)]),
}

/// The named set of required fields expected from the model for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputShape {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub primary: PrimaryText,
}

impl OutputShape {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

/// Catalog entry: the instruction template and shape for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub action: ActionType,
    /// Handlebars template; receives `input_text`
    pub template: &'static str,
    pub shape: &'static OutputShape,
}

const fn text(name: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text,
        description,
    }
}

static CLEANED_TEXT_SHAPE: OutputShape = OutputShape {
    name: "cleaned-text",
    fields: &[text("cleaned_text", "The cleaned and corrected text.")],
    primary: PrimaryText::Field("cleaned_text"),
};

static SUMMARY_SHAPE: OutputShape = OutputShape {
    name: "summary",
    fields: &[text("summary", "A concise summary of the input text.")],
    primary: PrimaryText::Field("summary"),
};

static KEY_POINTS_SHAPE: OutputShape = OutputShape {
    name: "key-points",
    fields: &[FieldSpec {
        name: "points",
        kind: FieldKind::TextList,
        description: "A list of key points extracted from the text.",
    }],
    primary: PrimaryText::Bullets("points"),
};

static SIMPLIFIED_TEXT_SHAPE: OutputShape = OutputShape {
    name: "simplified-text",
    fields: &[text(
        "simplified_text",
        "The simplified version of the input text.",
    )],
    primary: PrimaryText::Field("simplified_text"),
};

static ANALOGY_SHAPE: OutputShape = OutputShape {
    name: "analogy",
    fields: &[text(
        "analogy",
        "An analogy or example explaining the concept.",
    )],
    primary: PrimaryText::Field("analogy"),
};

static CATEGORY_SHAPE: OutputShape = OutputShape {
    name: "category",
    fields: &[text("category", "The category the text belongs to.")],
    primary: PrimaryText::Field("category"),
};

static TONE_SHAPE: OutputShape = OutputShape {
    name: "text-plus-explanation",
    fields: &[
        text("tone", "The emotional tone of the text."),
        text(
            "explanation",
            "Brief explanation of why this tone was selected.",
        ),
    ],
    primary: PrimaryText::Labeled(&[("Tone", "tone"), ("Explanation", "explanation")]),
};

static CLEAN: ActionSpec = ActionSpec {
    action: ActionType::Clean,
    template: "Clean up the following text. Fix spelling, grammar and punctuation, \
remove markup, stray symbols and redundant whitespace, and keep the original meaning \
and language. Do not add new content.\n\nText:\n{{input_text}}",
    shape: &CLEANED_TEXT_SHAPE,
};

static SUMMARIZE: ActionSpec = ActionSpec {
    action: ActionType::Summarize,
    template: "Summarize the following text in a few clear sentences. Keep the facts \
that matter and drop repetition.\n\nText:\n{{input_text}}",
    shape: &SUMMARY_SHAPE,
};

static KEY_POINTS: ActionSpec = ActionSpec {
    action: ActionType::KeyPoints,
    template: "Extract the key points of the following text. Each point is one short, \
self-contained sentence.\n\nText:\n{{input_text}}",
    shape: &KEY_POINTS_SHAPE,
};

static SIMPLIFY: ActionSpec = ActionSpec {
    action: ActionType::Simplify,
    template: "Rewrite the following text so a twelve-year-old can understand it. Use \
short sentences and everyday words.\n\nText:\n{{input_text}}",
    shape: &SIMPLIFIED_TEXT_SHAPE,
};

static ANALOGY: ActionSpec = ActionSpec {
    action: ActionType::Analogy,
    template: "Explain the main idea of the following text with one concrete analogy \
or real-world example.\n\nText:\n{{input_text}}",
    shape: &ANALOGY_SHAPE,
};

static CLASSIFY: ActionSpec = ActionSpec {
    action: ActionType::Classify,
    template: "Classify the following text into a single short category label such as \
Technology, Business, Science, Health, Politics, Entertainment or Other.\n\nText:\n{{input_text}}",
    shape: &CATEGORY_SHAPE,
};

static TONE: ActionSpec = ActionSpec {
    action: ActionType::Tone,
    template: "Identify the emotional tone of the following text in one or two words \
and briefly explain the choice.\n\nText:\n{{input_text}}",
    shape: &TONE_SHAPE,
};

/// Read-only lookup over every registered action
pub struct ActionCatalog;

impl ActionCatalog {
    /// Resolve an identifier to its catalog entry
    pub fn lookup(id: &str) -> Result<&'static ActionSpec, UnknownAction> {
        ActionType::parse(id).map(ActionType::spec)
    }

    pub fn all() -> impl Iterator<Item = &'static ActionSpec> {
        ActionType::ALL.into_iter().map(ActionType::spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(ActionType::parse("clean").unwrap(), ActionType::Clean);
        assert_eq!(ActionType::parse("Summarize").unwrap(), ActionType::Summarize);
        assert_eq!(ActionType::parse(" KEYPOINTS ").unwrap(), ActionType::KeyPoints);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(ActionType::parse("examples").unwrap(), ActionType::Analogy);
        assert_eq!(ActionType::parse("sentiment").unwrap(), ActionType::Tone);
        assert_eq!(ActionType::parse("key_points").unwrap(), ActionType::KeyPoints);
    }

    #[test]
    fn test_parse_unknown() {
        let err = ActionType::parse("translate").unwrap_err();
        assert_eq!(err, UnknownAction("translate".to_string()));
        assert_eq!(err.to_string(), "Unknown action: translate");
        assert!(ActionType::parse("").is_err());
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for action in ActionType::ALL {
            assert_eq!(ActionType::parse(action.as_str()).unwrap(), action);
        }
    }

    #[test]
    fn test_every_action_is_registered() {
        for action in ActionType::ALL {
            let spec = action.spec();
            assert_eq!(spec.action, action);
            assert!(spec.template.contains("{{input_text}}"));
            assert!(!spec.shape.fields.is_empty());
        }
        assert_eq!(ActionCatalog::all().count(), ActionType::ALL.len());
    }

    #[test]
    fn test_primary_fields_belong_to_shape() {
        for spec in ActionCatalog::all() {
            let shape = spec.shape;
            match shape.primary {
                PrimaryText::Field(name) => {
                    assert_eq!(shape.field(name).unwrap().kind, FieldKind::Text)
                }
                PrimaryText::Bullets(name) => {
                    assert_eq!(shape.field(name).unwrap().kind, FieldKind::TextList)
                }
                PrimaryText::Labeled(parts) => {
                    for (_, name) in parts {
                        assert!(shape.field(name).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn test_lookup() {
        let spec = ActionCatalog::lookup("tone").unwrap();
        assert_eq!(spec.shape.name, "text-plus-explanation");
        assert_eq!(spec.shape.field_names(), vec!["tone", "explanation"]);
        assert!(ActionCatalog::lookup("nope").is_err());
    }

    #[test]
    fn test_serde_names() {
        let yaml = serde_yaml::to_string(&ActionType::KeyPoints).unwrap();
        assert_eq!(yaml.trim(), "keypoints");
        let parsed: ActionType = serde_yaml::from_str("summarize").unwrap();
        assert_eq!(parsed, ActionType::Summarize);
    }
}
