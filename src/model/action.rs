use super::property::{PropertyDefinition, property_by_uuid};
use crate::error::ActionError;
use crate::rules::LogicExpression;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// What a bulk action does to rows matching the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionDescriptor {
    /// Delete every matching row.
    Remove,
    /// Modify every matching row in place.
    #[serde(rename_all = "camelCase")]
    Mutate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        set_tag: Option<TagAssignment>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        set_reserved: Option<ReservedAssignment>,
        #[serde(default)]
        properties: Vec<PropertyAction>,
    },
}

/// Assigns a tag to matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssignment {
    pub tag_id: i64,
}

/// Sets the reservation flag on matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedAssignment {
    pub value: bool,
}

/// What to do with a single property on matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyActionKind {
    SetValue,
    SetNull,
    Remove,
}

/// One property modification inside a mutate action. The property is
/// referenced by uuid and resolved to its path against the active property
/// list when the payload is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAction {
    pub uuid: Uuid,
    pub action: PropertyActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Wire payload of a bulk modification: the predicate plus whichever
/// mutations the action defined.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<bool>,
    /// Property path -> new value (a JSON `null` clears the value).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties_to_set: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties_to_remove: Vec<String>,
}

impl ModifyPayload {
    /// True when the payload carries no modification beyond the predicate.
    pub fn is_empty(&self) -> bool {
        self.tag_id.is_none()
            && self.reserved.is_none()
            && self.properties_to_set.is_empty()
            && self.properties_to_remove.is_empty()
    }
}

impl ActionDescriptor {
    /// Composes the bulk modification payload for this action against the
    /// active property list. `Ok(None)` means the action defines no
    /// modification at all (also the case for `Remove`, which is not a
    /// modification); callers must not issue a network request then.
    pub fn modify_payload(
        &self,
        properties: &[PropertyDefinition],
        logic: Option<&LogicExpression>,
    ) -> Result<Option<ModifyPayload>, ActionError> {
        let ActionDescriptor::Mutate {
            set_tag,
            set_reserved,
            properties: actions,
        } = self
        else {
            return Ok(None);
        };

        let mut payload = ModifyPayload {
            logic: logic.cloned(),
            ..ModifyPayload::default()
        };

        if let Some(tag) = set_tag {
            payload.tag_id = Some(tag.tag_id);
        }
        if let Some(reserved) = set_reserved {
            payload.reserved = Some(reserved.value);
        }

        for action in actions {
            let definition = property_by_uuid(properties, &action.uuid)
                .ok_or(ActionError::UnknownProperty(action.uuid))?;
            match action.action {
                PropertyActionKind::SetValue => {
                    payload.properties_to_set.insert(
                        definition.path.clone(),
                        action.value.clone().unwrap_or(Value::Null),
                    );
                }
                PropertyActionKind::SetNull => {
                    payload
                        .properties_to_set
                        .insert(definition.path.clone(), Value::Null);
                }
                PropertyActionKind::Remove => {
                    payload.properties_to_remove.push(definition.path.clone());
                }
            }
        }

        if payload.is_empty() {
            Ok(None)
        } else {
            Ok(Some(payload))
        }
    }
}
