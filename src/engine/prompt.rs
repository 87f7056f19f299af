//! Prompt composition
//!
//! Renders an action's template with the input text and appends the output
//! contract derived from the action's shape. A repair prompt additionally
//! names the defect of the previous attempt.

use handlebars::Handlebars;
use serde_json::json;

use super::error::{ExecutorError, FailureCategory};
use crate::workflow::{ActionCatalog, ActionSpec, OutputShape};

pub struct PromptComposer {
    registry: Handlebars<'static>,
}

impl PromptComposer {
    /// Compile the template of every catalog action
    pub fn new() -> Result<Self, ExecutorError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        for spec in ActionCatalog::all() {
            registry
                .register_template_string(spec.action.as_str(), spec.template)
                .map_err(|e| ExecutorError::Template(e.to_string()))?;
        }

        Ok(Self { registry })
    }

    /// Build the exact text sent to the model.
    ///
    /// `previous_failure` is the failure of the attempt being repaired; only
    /// output defects add a correction notice, since provider failures say
    /// nothing about what the model wrote.
    pub fn compose(
        &self,
        spec: &ActionSpec,
        input_text: &str,
        previous_failure: Option<&FailureCategory>,
    ) -> Result<String, ExecutorError> {
        let body = self
            .registry
            .render(spec.action.as_str(), &json!({ "input_text": input_text }))
            .map_err(|e| ExecutorError::Template(e.to_string()))?;

        let mut prompt = String::new();
        if let Some(reason) = previous_failure.and_then(FailureCategory::repair_reason) {
            prompt.push_str("Your previous response could not be used because ");
            prompt.push_str(&reason);
            prompt.push_str("\nRespond again following the required structure exactly.\n\n");
        }
        prompt.push_str(&body);
        prompt.push_str(&output_contract(spec.shape));
        Ok(prompt)
    }
}

fn output_contract(shape: &OutputShape) -> String {
    let fields: Vec<String> = shape
        .fields
        .iter()
        .map(|f| format!("- \"{}\" ({}): {}", f.name, f.kind.type_name(), f.description))
        .collect();
    let skeleton: Vec<String> = shape
        .fields
        .iter()
        .map(|f| format!("\"{}\": <{}>", f.name, f.kind.type_name()))
        .collect();

    format!(
        "\n\nCRITICAL OUTPUT INSTRUCTION:\n\
You MUST respond with exactly one JSON object with these fields:\n\
{}\n\
Required structure: {{{}}}\n\
Do NOT wrap the JSON in markdown code blocks.\n\
Do NOT include any conversational text before or after the JSON.\n\
Return ONLY the JSON object.",
        fields.join("\n"),
        skeleton.join(", ")
    )
}
