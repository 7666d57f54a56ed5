//! Actions: plain serializable records describing "what happened".
//!
//! An [`Action`] carries a mandatory discriminant (serialized as `"type"`)
//! plus arbitrary additional fields. Untrusted values enter through
//! [`Action::from_value`], which rejects anything that is not a record with
//! a string discriminant; everything past that boundary is well-formed by
//! construction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::StoreError;

/// An immutable record with a discriminant describing an intended state
/// transition.
///
/// Actions should stay serializable: the payload is a plain JSON map, not
/// arbitrary Rust values, so a dispatched sequence can be recorded and
/// replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Action {
    /// Creates an action with the given discriminant and no payload.
    ///
    /// An empty discriminant is accepted here but rejected at dispatch
    /// time with [`StoreError::InvalidAction`].
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    /// Adds a payload field, consuming and returning the action.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Validates an untrusted JSON value into an action.
    ///
    /// Fails with [`StoreError::InvalidAction`] if the value is not an
    /// object, has no `"type"` member, or its `"type"` is not a string.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let Value::Object(mut map) = value else {
            return Err(StoreError::InvalidAction {
                reason: "not a plain record".to_string(),
            });
        };
        let Some(kind) = map.remove("type") else {
            return Err(StoreError::InvalidAction {
                reason: "missing \"type\" discriminant".to_string(),
            });
        };
        let Value::String(kind) = kind else {
            return Err(StoreError::InvalidAction {
                reason: "\"type\" discriminant is not a string".to_string(),
            });
        };
        Ok(Self { kind, payload: map })
    }

    /// The action's discriminant.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Looks up a payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// Synthetic action kinds used internally by the store.
///
/// Each carries a random suffix so user reducers cannot match on them and
/// must fall through to their default arm, which is what seeds initial
/// sub-state.
pub(crate) mod kinds {
    use super::*;

    pub(crate) const INIT_PREFIX: &str = "@@store/INIT";
    pub(crate) const REPLACE_PREFIX: &str = "@@store/REPLACE";
    pub(crate) const PROBE_PREFIX: &str = "@@store/PROBE_UNKNOWN_ACTION";

    /// Dispatched once at construction so every reducer reports its
    /// default state.
    pub(crate) fn init() -> Action {
        Action::new(format!("{INIT_PREFIX}/{}", Uuid::new_v4()))
    }

    /// Dispatched by `replace_reducer` so slices introduced by the new
    /// reducer seed their defaults.
    pub(crate) fn replace() -> Action {
        Action::new(format!("{REPLACE_PREFIX}/{}", Uuid::new_v4()))
    }

    /// Used by the reducer combinator to assert that slice reducers
    /// handle unknown actions by returning their current state.
    pub(crate) fn probe() -> Action {
        Action::new(format!("{PROBE_PREFIX}/{}", Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_accepts_record_with_string_type() {
        let action = Action::from_value(json!({"type": "INCREMENT", "by": 2})).unwrap();
        assert_eq!(action.kind(), "INCREMENT");
        assert_eq!(action.field("by"), Some(&json!(2)));
    }

    #[test]
    fn from_value_rejects_non_record() {
        assert!(matches!(
            Action::from_value(json!(42)),
            Err(StoreError::InvalidAction { .. })
        ));
        assert!(matches!(
            Action::from_value(json!(["INCREMENT"])),
            Err(StoreError::InvalidAction { .. })
        ));
    }

    #[test]
    fn from_value_rejects_missing_type() {
        assert!(matches!(
            Action::from_value(json!({"payload": 1})),
            Err(StoreError::InvalidAction { .. })
        ));
    }

    #[test]
    fn from_value_rejects_non_string_type() {
        assert!(matches!(
            Action::from_value(json!({"type": 7})),
            Err(StoreError::InvalidAction { .. })
        ));
    }

    #[test]
    fn serializes_with_type_member() {
        let action = Action::new("ADD_TODO").with_field("text", "buy milk");
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value, json!({"type": "ADD_TODO", "text": "buy milk"}));
    }

    #[test]
    fn synthetic_kinds_are_unique() {
        assert_ne!(kinds::init().kind(), kinds::init().kind());
        assert!(kinds::init().kind().starts_with(kinds::INIT_PREFIX));
        assert!(kinds::probe().kind().starts_with(kinds::PROBE_PREFIX));
    }
}
