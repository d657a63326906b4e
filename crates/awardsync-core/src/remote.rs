//! Remote record primitives shared by the tracking client and the synchronizer.
//!
//! The tracking service addresses every record by entity type plus numeric id.
//! Payloads are plain JSON maps; lookups take `[field, operator, value]`
//! filter triples that are implicitly AND-ed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote entity type names used by the awards project.
pub mod entity {
    pub const PROJECT: &str = "Project";
    pub const SUBMISSION: &str = "CustomEntity04";
    pub const VERSION: &str = "Version";
    pub const PERSON: &str = "HumanUser";
    pub const COMPANY: &str = "CustomNonProjectEntity01";
    pub const CATEGORY: &str = "Shot";
    pub const VETTING_CHECKLIST: &str = "TaskTemplate";
}

/// Status a retired Submission is moved to.
pub const WITHDRAWN_STATUS: &str = "wdraw";

/// Status new Persons are created with.
pub const DISABLED_STATUS: &str = "dis";

/// Link to a remote record, serialised as `{"type": ..., "id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: i64,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, id: i64) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
        }
    }

    pub fn project(id: i64) -> Self {
        Self::new(entity::PROJECT, id)
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "type": self.entity_type, "id": self.id })
    }

    /// Read a link out of a JSON value, ignoring any extra keys such as `name`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let entity_type = value.get("type")?.as_str()?;
        let id = value.get("id")?.as_i64()?;
        Some(Self::new(entity_type, id))
    }
}

/// One `[field, operator, value]` lookup condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter(pub String, pub String, pub Value);

impl Filter {
    /// `[field, "is", value]`
    pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self(field.into(), "is".to_string(), value.into())
    }

    /// `["project", "is", {"type": "Project", "id": ..}]`
    pub fn in_project(project: &EntityRef) -> Self {
        Self::is("project", project.to_value())
    }

    pub fn field(&self) -> &str {
        &self.0
    }

    pub fn operator(&self) -> &str {
        &self.1
    }

    pub fn value(&self) -> &Value {
        &self.2
    }
}

/// A record returned by the tracking service.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity_type: String,
    pub id: i64,
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.entity_type.clone(), self.id)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        let value = self.get(field)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
    }

    /// Display name of an uploaded attachment field, e.g. `sg_uploaded_movie`.
    pub fn attachment_name(&self, field: &str) -> Option<&str> {
        self.get(field)?.get("name")?.as_str()
    }

    /// Entity links held in a multi-entity field such as `projects`.
    pub fn links(&self, field: &str) -> Vec<EntityRef> {
        self.get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(EntityRef::from_value).collect())
            .unwrap_or_default()
    }
}
