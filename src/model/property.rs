use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The value type of a property, which controls the operators a rule
/// condition on that property may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Numeric,
    Date,
    Datetime,
    Time,
    Bool,
    /// Enumerated values; `enum_id` on the definition points at the list.
    Select,
}

/// A single property definition as stored on a class, a task or a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Stable identity of the definition, preserved across merges.
    pub uuid: Uuid,
    /// Stable field locator inside a data row, e.g. `$.shipment.status`.
    pub path: String,
    pub title: String,
    #[serde(rename = "type")]
    pub data_type: PropertyType,
    #[serde(default, rename = "enumId", skip_serializing_if = "Option::is_none")]
    pub enum_id: Option<i64>,
}

impl PropertyDefinition {
    pub fn new(path: impl Into<String>, title: impl Into<String>, data_type: PropertyType) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            path: path.into(),
            title: title.into(),
            data_type,
            enum_id: None,
        }
    }

    pub fn with_enum(mut self, enum_id: i64) -> Self {
        self.enum_id = Some(enum_id);
        self
    }
}

/// Merges property definitions from a class, a task and a filter into one
/// ordered list keyed by `path`. The first occurrence of a path wins, so
/// class definitions shadow task definitions, which shadow filter
/// definitions. Inputs are left untouched.
pub fn merge_properties(
    class_properties: &[PropertyDefinition],
    task_properties: &[PropertyDefinition],
    filter_properties: &[PropertyDefinition],
) -> Vec<PropertyDefinition> {
    class_properties
        .iter()
        .chain(task_properties)
        .chain(filter_properties)
        .unique_by(|property| property.path.clone())
        .cloned()
        .collect()
}

/// Finds a property definition by its stable uuid.
pub fn property_by_uuid<'a>(
    properties: &'a [PropertyDefinition],
    uuid: &Uuid,
) -> Option<&'a PropertyDefinition> {
    properties.iter().find(|property| property.uuid == *uuid)
}
