use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Built-in column every bucket exposes: the id of the tag set on a row.
pub const TAG_COLUMN: &str = "tagId";
/// Built-in column every bucket exposes: the reservation flag of a row.
pub const RESERVED_COLUMN: &str = "reserved";
/// Built-in column every bucket exposes: the user a row is reserved for.
pub const OWNER_COLUMN: &str = "owner";

/// A single data row as returned by the remote store, with its built-in
/// columns and the free-form properties object the class describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    pub id: i64,
    #[serde(default)]
    pub tag_id: Option<i64>,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub owner: Option<String>,
    /// Arbitrary JSON object holding the class-defined properties.
    #[serde(default)]
    pub properties: Value,
}

impl DataRow {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            tag_id: None,
            reserved: false,
            owner: None,
            properties: Value::Null,
        }
    }

    /// Resolves a condition field path against this row. Built-in columns
    /// are addressed by name; property paths (`$.a.b`) traverse the
    /// properties object segment by segment. Returns `None` when the path
    /// does not resolve to a value.
    pub fn field_value(&self, path: &str) -> Option<Value> {
        match path {
            TAG_COLUMN => self.tag_id.map(Value::from),
            RESERVED_COLUMN => Some(Value::Bool(self.reserved)),
            OWNER_COLUMN => self.owner.clone().map(Value::String),
            _ => {
                let mut current = &self.properties;
                for segment in path.strip_prefix("$.")?.split('.') {
                    current = current.as_object()?.get(segment)?;
                }
                Some(current.clone())
            }
        }
    }
}
