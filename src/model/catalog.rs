use super::action::ActionDescriptor;
use super::property::PropertyDefinition;
use crate::error::SelectError;
use crate::rules::{LogicExpression, RuleNode};
use serde::{Deserialize, Serialize};

/// A named collection of data rows under a project. A bucket optionally
/// references a class (its baseline property schema) and whitelists the
/// tags, tasks and filters usable on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub tags_ids: Vec<i64>,
    #[serde(default)]
    pub tasks_ids: Vec<i64>,
    #[serde(default)]
    pub filters_ids: Vec<i64>,
}

/// A schema template defining the baseline properties of rows in a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataClass {
    pub id: i64,
    pub name: String,
    /// The property definitions rows of this class carry.
    pub configuration: Vec<PropertyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
}

/// One selectable value of an enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumItem {
    pub value: String,
    pub text: String,
}

/// A named list of values referenced by `select`-typed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnum {
    pub id: i64,
    pub name: String,
    pub items: Vec<EnumItem>,
}

/// A saved action plus an optional filter reference, selectable as a bulk
/// operation template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub filter_id: Option<i64>,
    pub configuration: TaskConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfiguration {
    pub actions: ActionDescriptor,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

/// A saved rule tree with its own property set, reusable across tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: i64,
    pub name: String,
    pub configuration: FilterConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfiguration {
    #[serde(default)]
    pub logic: Option<LogicExpression>,
    #[serde(default)]
    pub tree: Option<RuleNode>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

/// Reference data the embedding application resolves once per project and
/// passes in explicitly; this core never reaches for ambient lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub classes: Vec<DataClass>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub users: Vec<UserInfo>,
    #[serde(default)]
    pub enums: Vec<DataEnum>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl Catalog {
    pub fn class(&self, id: i64) -> Option<&DataClass> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn tag(&self, id: i64) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn enumeration(&self, id: i64) -> Option<&DataEnum> {
        self.enums.iter().find(|item| item.id == id)
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filter(&self, id: i64) -> Option<&Filter> {
        self.filters.iter().find(|filter| filter.id == id)
    }

    /// The tags allowed on the given bucket, in catalog order.
    pub fn bucket_tags(&self, bucket: &Bucket) -> Vec<Tag> {
        self.tags
            .iter()
            .filter(|tag| bucket.tags_ids.contains(&tag.id))
            .cloned()
            .collect()
    }

    /// The tasks selectable on the given bucket, in catalog order.
    pub fn bucket_tasks(&self, bucket: &Bucket) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| bucket.tasks_ids.contains(&task.id))
            .collect()
    }

    /// Baseline properties from the bucket's class. A bucket without a class
    /// has an empty baseline; a class id that resolves to nothing is a
    /// failed collaborator lookup.
    pub fn class_properties(&self, bucket: &Bucket) -> Result<Vec<PropertyDefinition>, SelectError> {
        match bucket.class_id {
            Some(class_id) => self
                .class(class_id)
                .map(|class| class.configuration.clone())
                .ok_or(SelectError::ClassNotFound(class_id)),
            None => Ok(Vec::new()),
        }
    }
}
