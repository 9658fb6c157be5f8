use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    entities::resource::Editable,
    errors::{DashboardError, FieldError},
    utils::html::is_http_url,
};

use super::text::{split_list, Separator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Url,
    TextArea,
    /// HTML produced by the rich-text editor; stored untrimmed.
    RichText,
    Select(&'static [&'static str]),
    CommaList,
    LineList,
    MultiSelect(&'static [&'static str]),
    Checkbox,
}

/// One input of a resource form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Wire name of the field in the API payload.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, label, kind, required: true }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, label, kind, required: false }
    }
}

/// Shapes raw form input into the JSON object the API expects.
pub fn normalize(schema: &[FieldSpec], input: &Map<String, Value>) -> Result<Map<String, Value>, Vec<FieldError>> {
    let mut output = Map::new();
    let mut errors = Vec::new();

    for field in schema {
        let raw = input.get(field.name).unwrap_or(&Value::Null);
        match normalize_field(field, raw) {
            Ok(value) => {
                output.insert(field.name.to_string(), value);
            }
            Err(message) => errors.push(FieldError::new(field.name, message)),
        }
    }

    if errors.is_empty() { Ok(output) } else { Err(errors) }
}

fn normalize_field(field: &FieldSpec, raw: &Value) -> Result<Value, String> {
    match field.kind {
        FieldKind::Text | FieldKind::TextArea | FieldKind::Url | FieldKind::Select(_) => {
            let text = scalar_text(raw);
            let text = text.trim();
            if text.is_empty() {
                return missing(field, Value::Null);
            }
            match field.kind {
                FieldKind::Url if !is_http_url(text) => Err(format!("{} must be a valid URL", field.label)),
                FieldKind::Select(options) if !options.contains(&text) => {
                    Err(format!("{} must be one of: {}", field.label, options.join(", ")))
                }
                _ => Ok(Value::String(text.to_string())),
            }
        }
        FieldKind::RichText => {
            let text = scalar_text(raw);
            if text.trim().is_empty() {
                return missing(field, Value::Null);
            }
            Ok(Value::String(text))
        }
        FieldKind::CommaList | FieldKind::LineList | FieldKind::MultiSelect(_) => {
            let separator = match field.kind {
                FieldKind::LineList => Separator::Line,
                _ => Separator::Comma,
            };
            let mut items: Vec<String> = match raw {
                Value::Array(values) => values
                    .iter()
                    .map(|v| scalar_text(v).trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                other => split_list(&scalar_text(other), separator),
            };
            if matches!(field.kind, FieldKind::MultiSelect(_)) {
                let mut seen = Vec::with_capacity(items.len());
                items.retain(|item| {
                    if seen.contains(item) {
                        false
                    } else {
                        seen.push(item.clone());
                        true
                    }
                });
            }
            if items.is_empty() && field.required {
                return Err(format!("{} requires at least one entry", field.label));
            }
            Ok(Value::Array(items.into_iter().map(Value::String).collect()))
        }
        FieldKind::Checkbox => Ok(Value::Bool(match raw {
            Value::Bool(b) => *b,
            Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "on" | "1" | "yes"),
            Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
            _ => false,
        })),
    }
}

fn missing(field: &FieldSpec, empty: Value) -> Result<Value, String> {
    if field.required {
        Err(format!("{} is required", field.label))
    } else {
        Ok(empty)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Normalizes a submission, derives computed fields, then decodes and validates the payload.
pub fn parse_payload<E: Editable>(input: &Map<String, Value>) -> Result<E::Payload, DashboardError> {
    let mut fields = normalize(E::form_schema(), input).map_err(DashboardError::Validation)?;
    E::derive_fields(&mut fields);

    let payload: E::Payload = serde_json::from_value(Value::Object(fields))
        .map_err(|e| DashboardError::BadRequest(format!("invalid form submission: {e}")))?;
    payload.validate()?;
    Ok(payload)
}
