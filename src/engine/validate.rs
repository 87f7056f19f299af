//! Shape validation
//!
//! Check an extracted payload against an action's [`OutputShape`] and turn
//! it into a [`ShapedOutput`]. Validation always inspects every field so the
//! full defect list is available to a repair prompt.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::error::{ShapeError, ShapeViolation};
use super::extract::Payload;
use crate::workflow::{FieldKind, OutputShape, PrimaryText};

/// A validated field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
}

/// A payload that satisfied its output shape.
///
/// Holds exactly the shape's fields; anything else the model sent is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapedOutput {
    #[serde(skip)]
    shape: &'static OutputShape,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl ShapedOutput {
    pub fn shape(&self) -> &'static OutputShape {
        self.shape
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, field: &str) -> Option<&[String]> {
        match self.fields.get(field) {
            Some(FieldValue::TextList(items)) => Some(items),
            _ => None,
        }
    }

    /// The text handed to the next step of a workflow
    pub fn primary_text(&self) -> String {
        match self.shape.primary {
            PrimaryText::Field(name) => self.text(name).unwrap_or_default().to_string(),
            PrimaryText::Bullets(name) => self
                .list(name)
                .unwrap_or_default()
                .iter()
                .map(|item| format!("- {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
            PrimaryText::Labeled(parts) => parts
                .iter()
                .map(|(label, name)| format!("{}: {}", label, self.text(name).unwrap_or_default()))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a payload against a shape, reporting every violation at once
pub fn validate(payload: &Payload, shape: &'static OutputShape) -> Result<ShapedOutput, ShapeError> {
    let mut fields = BTreeMap::new();
    let mut violations = Vec::new();

    for spec in shape.fields {
        let field = spec.name.to_string();
        let Some(value) = payload.get(spec.name) else {
            violations.push(ShapeViolation::Missing { field });
            continue;
        };

        match (spec.kind, value) {
            (FieldKind::Text, Value::String(s)) => {
                if s.trim().is_empty() {
                    violations.push(ShapeViolation::Blank { field });
                } else {
                    fields.insert(field, FieldValue::Text(s.trim().to_string()));
                }
            }
            (FieldKind::TextList, Value::Array(items)) => {
                let texts: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(|s| s.trim().to_string()))
                    .collect();
                match texts {
                    None => violations.push(ShapeViolation::WrongType {
                        field,
                        expected: spec.kind.type_name(),
                        found: "array with non-string items",
                    }),
                    Some(texts) if texts.iter().all(|t| t.is_empty()) => {
                        violations.push(ShapeViolation::Blank { field })
                    }
                    Some(texts) => {
                        let texts = texts.into_iter().filter(|t| !t.is_empty()).collect();
                        fields.insert(field, FieldValue::TextList(texts));
                    }
                }
            }
            (kind, other) => violations.push(ShapeViolation::WrongType {
                field,
                expected: kind.type_name(),
                found: type_name(other),
            }),
        }
    }

    if violations.is_empty() {
        Ok(ShapedOutput { shape, fields })
    } else {
        Err(ShapeError {
            shape: shape.name,
            violations,
        })
    }
}
