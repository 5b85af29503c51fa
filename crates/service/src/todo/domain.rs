use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validation::{model_message, Fields, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i32,
    pub description: String,
    pub completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<models::todo::Model> for Todo {
    fn from(m: models::todo::Model) -> Self {
        Self {
            id: m.id,
            description: m.description,
            completed: m.completed,
            user_id: m.user_id,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// Validated input for creating a todo; only the constructors can build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    description: String,
    completed: bool,
}

impl NewTodo {
    pub fn description(&self) -> &str { &self.description }

    pub fn completed(&self) -> bool { self.completed }

    pub fn new(description: &str, completed: bool) -> Result<Self, ValidationErrors> {
        let description = models::todo::validate_description(description)
            .map_err(|e| ValidationErrors::single("description", model_message(e)))?;
        Ok(Self { description, completed })
    }

    /// Schema: `description` (string, required), `completed` (boolean, default false).
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::object(body)?;
        let description = f.required_string("description");
        let completed = f.optional_bool("completed");
        let description = match description.map(models::todo::validate_description) {
            Some(Ok(d)) => Some(d),
            Some(Err(e)) => {
                f.reject("description", model_message(e));
                None
            }
            None => None,
        };
        f.finish()?;
        match description {
            Some(description) => Ok(Self { description, completed: completed.unwrap_or(false) }),
            None => Err(ValidationErrors::single("description", "is required")),
        }
    }
}

/// Validated partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    description: Option<String>,
    completed: Option<bool>,
}

impl TodoPatch {
    /// A provided description gets the same trimming and checks as on create.
    pub fn new(description: Option<&str>, completed: Option<bool>) -> Result<Self, ValidationErrors> {
        let description = description
            .map(models::todo::validate_description)
            .transpose()
            .map_err(|e| ValidationErrors::single("description", model_message(e)))?;
        Ok(Self { description, completed })
    }

    pub fn description(&self) -> Option<&str> { self.description.as_deref() }

    pub fn completed(&self) -> Option<bool> { self.completed }

    /// Schema: `description` (string, optional), `completed` (boolean, optional).
    /// Every provided field must pass before the patch exists at all.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::object(body)?;
        let description = f.optional_string("description");
        let completed = f.optional_bool("completed");
        let description = match description.map(models::todo::validate_description) {
            Some(Ok(d)) => Some(d),
            Some(Err(e)) => {
                f.reject("description", model_message(e));
                None
            }
            None => None,
        };
        f.finish()?;
        Ok(Self { description, completed })
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.completed.is_none()
    }
}

/// Optional narrowing for `list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    /// case-insensitive substring of the description
    pub q: Option<String>,
}

impl TodoFilter {
    /// Build from raw query values: only `true`/`false` narrow by completion,
    /// and a blank `q` is ignored.
    pub fn from_query(completed: Option<&str>, q: Option<&str>) -> Self {
        let completed = match completed {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        let q = q.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self { completed, q }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(c) = self.completed {
            if todo.completed != c {
                return false;
            }
        }
        match &self.q {
            Some(q) => todo.description.to_lowercase().contains(&q.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_trims_and_defaults() {
        let t = NewTodo::from_json(&json!({"description": "  Buy milk  "})).unwrap();
        assert_eq!(t, NewTodo::new("Buy milk", false).unwrap());
        assert_eq!(t.description(), "Buy milk");

        let t = NewTodo::from_json(&json!({"description": "Pay rent", "completed": true, "id": 99})).unwrap();
        assert!(t.completed());
    }

    #[test]
    fn create_rejects_blank_and_mistyped() {
        let errs = NewTodo::from_json(&json!({"description": "   "})).unwrap_err();
        assert!(errs.has_field("description"));

        let errs = NewTodo::from_json(&json!({"completed": "no"})).unwrap_err();
        assert!(errs.has_field("description"));
        assert!(errs.has_field("completed"));

        assert!(NewTodo::new("", false).is_err());
    }

    #[test]
    fn patch_fails_as_a_whole() {
        let errs = TodoPatch::from_json(&json!({"description": "fine", "completed": "yes"})).unwrap_err();
        assert_eq!(errs.fields().len(), 1);
        assert!(errs.has_field("completed"));

        let p = TodoPatch::from_json(&json!({"description": " new text "})).unwrap();
        assert_eq!(p.description(), Some("new text"));
        assert_eq!(p.completed(), None);
        assert!(TodoPatch::from_json(&json!({"owner": "someone"})).unwrap().is_empty());
    }

    #[test]
    fn patch_constructor_validates_description() {
        assert!(TodoPatch::new(Some(""), None).unwrap_err().has_field("description"));
        assert!(TodoPatch::new(Some("   "), Some(true)).is_err());
        let p = TodoPatch::new(Some("  tidy  "), None).unwrap();
        assert_eq!(p.description(), Some("tidy"));
        assert!(TodoPatch::new(None, None).unwrap().is_empty());
    }

    #[test]
    fn filter_parsing_and_matching() {
        let f = TodoFilter::from_query(Some("true"), Some("  MILK "));
        assert_eq!(f.completed, Some(true));
        assert_eq!(f.q.as_deref(), Some("MILK"));
        assert_eq!(TodoFilter::from_query(Some("yes"), Some("")), TodoFilter::default());

        let now = Utc::now();
        let todo = Todo {
            id: 1,
            description: "Buy milk".into(),
            completed: true,
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        assert!(f.matches(&todo));
        assert!(!TodoFilter::from_query(Some("false"), None).matches(&todo));
        assert!(!TodoFilter::from_query(None, Some("bread")).matches(&todo));
    }
}
