//! Explicit request schemas.
//!
//! Each write operation declares the fields it accepts and their JSON types;
//! the body is checked field by field and every problem is collected before
//! anything reaches a repository. Fields that are not declared are ignored.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self { Self::default() }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError { field: field.to_string(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn fields(&self) -> &[FieldError] { &self.0 }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Typed accessors over a JSON object body that accumulate errors.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    /// The body must be a JSON object.
    pub fn object(body: &'a Value) -> Result<Self, ValidationErrors> {
        match body.as_object() {
            Some(map) => Ok(Self { map, errors: ValidationErrors::new() }),
            None => Err(ValidationErrors::single("body", "must be a JSON object")),
        }
    }

    pub fn required_string(&mut self, name: &str) -> Option<&'a str> {
        if !self.map.contains_key(name) {
            self.errors.add(name, "is required");
            return None;
        }
        self.optional_string(name)
    }

    /// `None` when absent; a present value of any other type (null included) is an error.
    pub fn optional_string(&mut self, name: &str) -> Option<&'a str> {
        match self.map.get(name) {
            None => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                self.errors.add(name, "must be a string");
                None
            }
        }
    }

    pub fn optional_bool(&mut self, name: &str) -> Option<bool> {
        match self.map.get(name) {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                self.errors.add(name, "must be a boolean");
                None
            }
        }
    }

    pub fn reject(&mut self, name: &str, message: impl Into<String>) {
        self.errors.add(name, message);
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(self.errors) }
    }
}

/// Message carried by a model-level validation failure.
pub fn model_message(e: models::errors::ModelError) -> String {
    match e {
        models::errors::ModelError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_every_field_problem() {
        let body = json!({"description": 5, "completed": "yes", "extra": true});
        let mut f = Fields::object(&body).unwrap();
        assert_eq!(f.optional_string("description"), None);
        assert_eq!(f.optional_bool("completed"), None);
        let errs = f.finish().unwrap_err();
        assert_eq!(errs.fields().len(), 2);
        assert!(errs.has_field("description"));
        assert!(errs.has_field("completed"));
        assert_eq!(errs.to_string(), "description: must be a string; completed: must be a boolean");
    }

    #[test]
    fn missing_required_field_reported() {
        let body = json!({});
        let mut f = Fields::object(&body).unwrap();
        assert_eq!(f.required_string("email"), None);
        let errs = f.finish().unwrap_err();
        assert_eq!(errs.fields()[0].message, "is required");
    }

    #[test]
    fn non_object_body_rejected() {
        let body = json!(["not", "an", "object"]);
        let errs = Fields::object(&body).err().unwrap();
        assert!(errs.has_field("body"));
    }

    #[test]
    fn null_is_not_a_string() {
        let body = json!({"description": null});
        let mut f = Fields::object(&body).unwrap();
        assert_eq!(f.optional_string("description"), None);
        assert!(f.finish().is_err());
    }

    #[test]
    fn serializes_as_field_list() {
        let errs = ValidationErrors::single("email", "invalid email");
        assert_eq!(
            serde_json::to_value(&errs).unwrap(),
            json!([{"field": "email", "message": "invalid email"}])
        );
    }
}
