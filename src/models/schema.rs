//! Rule-table validation for the domain entities.
//!
//! Every entity declares a static [`Schema`]: one [`FieldRule`] per field,
//! stating whether the field is required, what JSON shape it must have and
//! which range constraint applies. [`Schema::check`] walks the whole table
//! (recursing into embedded entities) and reports every violation at once.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
    /// RFC 3339 timestamp string
    Timestamp,
    TextList,
    NumberList,
    Object(&'static Schema),
    ObjectList(&'static Schema),
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Timestamp => "RFC 3339 timestamp",
            FieldKind::TextList => "list of text",
            FieldKind::NumberList => "list of numbers",
            FieldKind::Object(schema) => schema.entity,
            FieldKind::ObjectList(_) => "list of objects",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    None,
    NonEmpty,
    Min(i64),
    Len(usize),
}

#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub constraint: Constraint,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
            constraint: Constraint::None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
            constraint: Constraint::None,
        }
    }

    pub const fn with(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }
}

#[derive(Debug)]
pub struct Schema {
    pub entity: &'static str,
    pub fields: &'static [FieldRule],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("invalid {entity}: {}", summarize(.violations))]
pub struct ValidationError {
    pub entity: &'static str,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(entity: &'static str, field: &str, kind: ViolationKind, message: String) -> Self {
        Self {
            entity,
            violations: vec![FieldViolation {
                field: field.to_string(),
                kind,
                message,
            }],
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

impl Schema {
    /// Validate `value` against this table, collecting every violation.
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.collect("", value, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                entity: self.entity,
                violations,
            })
        }
    }

    fn collect(&self, path: &str, value: &Value, out: &mut Vec<FieldViolation>) {
        let Some(object) = value.as_object() else {
            let field = if path.is_empty() { "<root>" } else { path };
            out.push(FieldViolation {
                field: field.to_string(),
                kind: ViolationKind::WrongType,
                message: format!("expected {} object", self.entity),
            });
            return;
        };

        for rule in self.fields {
            let field = join_path(path, rule.name);
            match object.get(rule.name) {
                None | Some(Value::Null) => {
                    if rule.required {
                        out.push(FieldViolation {
                            field,
                            kind: ViolationKind::Missing,
                            message: "field required".to_string(),
                        });
                    }
                }
                Some(present) => rule.check_value(&field, present, out),
            }
        }
    }
}

impl FieldRule {
    fn check_value(&self, field: &str, value: &Value, out: &mut Vec<FieldViolation>) {
        let wrong_type = |out: &mut Vec<FieldViolation>| {
            out.push(FieldViolation {
                field: field.to_string(),
                kind: ViolationKind::WrongType,
                message: format!("expected {}", self.kind.describe()),
            });
        };

        match self.kind {
            FieldKind::Text => match value.as_str() {
                Some(text) => self.check_text(field, text, out),
                None => wrong_type(out),
            },
            FieldKind::Integer => match value.as_i64() {
                Some(n) => self.check_integer(field, n, out),
                None => wrong_type(out),
            },
            FieldKind::Number => {
                if !value.is_number() {
                    wrong_type(out);
                }
            }
            FieldKind::Timestamp => {
                let parsed = value.as_str().map(DateTime::parse_from_rfc3339);
                if !matches!(parsed, Some(Ok(_))) {
                    wrong_type(out);
                }
            }
            FieldKind::TextList => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            out.push(FieldViolation {
                                field: format!("{field}[{i}]"),
                                kind: ViolationKind::WrongType,
                                message: "expected text".to_string(),
                            });
                        }
                    }
                    self.check_len(field, items.len(), out);
                }
                None => wrong_type(out),
            },
            FieldKind::NumberList => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_number() {
                            out.push(FieldViolation {
                                field: format!("{field}[{i}]"),
                                kind: ViolationKind::WrongType,
                                message: "expected number".to_string(),
                            });
                        }
                    }
                    self.check_len(field, items.len(), out);
                }
                None => wrong_type(out),
            },
            FieldKind::Object(schema) => schema.collect(field, value, out),
            FieldKind::ObjectList(schema) => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        schema.collect(&format!("{field}[{i}]"), item, out);
                    }
                    self.check_len(field, items.len(), out);
                }
                None => wrong_type(out),
            },
        }
    }

    fn check_text(&self, field: &str, text: &str, out: &mut Vec<FieldViolation>) {
        if matches!(self.constraint, Constraint::NonEmpty) && text.trim().is_empty() {
            out.push(FieldViolation {
                field: field.to_string(),
                kind: ViolationKind::OutOfRange,
                message: "must not be empty".to_string(),
            });
        }
    }

    fn check_integer(&self, field: &str, n: i64, out: &mut Vec<FieldViolation>) {
        if let Constraint::Min(min) = self.constraint {
            if n < min {
                out.push(FieldViolation {
                    field: field.to_string(),
                    kind: ViolationKind::OutOfRange,
                    message: format!("must be greater than or equal to {min}, got {n}"),
                });
            }
        }
    }

    fn check_len(&self, field: &str, len: usize, out: &mut Vec<FieldViolation>) {
        if let Constraint::Len(expected) = self.constraint {
            if len != expected {
                out.push(FieldViolation {
                    field: field.to_string(),
                    kind: ViolationKind::OutOfRange,
                    message: format!("must have exactly {expected} elements, got {len}"),
                });
            }
        }
    }
}
