use super::Operator;
use crate::model::{
    DataEnum, OWNER_COLUMN, PropertyDefinition, PropertyType, RESERVED_COLUMN, TAG_COLUMN, Tag,
    UserInfo,
};
use ahash::AHashMap;
use serde_json::{Value, json};

/// How a field renders in the builder and which operand shapes it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
    Bool,
    Date,
    Datetime,
    Time,
    Select,
}

/// A selectable value of a `Select`-kind field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChoice {
    pub value: Value,
    pub label: String,
}

/// A single field usable in rule conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub path: String,
    pub label: String,
    pub kind: FieldKind,
    /// Operators a condition on this field may use.
    pub operators: Vec<Operator>,
    /// Value choices for `Select`-kind fields; empty otherwise.
    pub choices: Vec<FieldChoice>,
}

/// The operator/type compatibility schema a rule tree is validated against:
/// every selectable field, in display order, with an index by path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryConfig {
    fields: Vec<FieldDefinition>,
    index: AHashMap<String, usize>,
}

impl QueryConfig {
    /// All fields in display order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Looks up a field by its path.
    pub fn field(&self, path: &str) -> Option<&FieldDefinition> {
        self.index.get(path).map(|position| &self.fields[*position])
    }

    /// True when the field exists and allows the operator.
    pub fn allows(&self, path: &str, operator: Operator) -> bool {
        self.field(path)
            .is_some_and(|field| field.operators.contains(&operator))
    }

    /// Appends a field unless one with the same path is already present;
    /// the first definition of a path wins, matching property
    /// reconciliation.
    fn insert(&mut self, field: FieldDefinition) {
        if self.index.contains_key(&field.path) {
            return;
        }
        self.index.insert(field.path.clone(), self.fields.len());
        self.fields.push(field);
    }
}

fn field_kind(data_type: PropertyType) -> FieldKind {
    match data_type {
        PropertyType::String => FieldKind::Text,
        PropertyType::Numeric => FieldKind::Numeric,
        PropertyType::Date => FieldKind::Date,
        PropertyType::Datetime => FieldKind::Datetime,
        PropertyType::Time => FieldKind::Time,
        PropertyType::Bool => FieldKind::Bool,
        PropertyType::Select => FieldKind::Select,
    }
}

fn operators_for(kind: FieldKind) -> Vec<Operator> {
    match kind {
        FieldKind::Text => vec![
            Operator::Equal,
            Operator::NotEqual,
            Operator::In,
            Operator::NotIn,
            Operator::IsNull,
            Operator::IsNotNull,
        ],
        FieldKind::Numeric | FieldKind::Date | FieldKind::Datetime | FieldKind::Time => vec![
            Operator::Equal,
            Operator::NotEqual,
            Operator::Greater,
            Operator::GreaterOrEqual,
            Operator::Less,
            Operator::LessOrEqual,
            Operator::IsNull,
            Operator::IsNotNull,
        ],
        FieldKind::Bool => vec![
            Operator::Equal,
            Operator::NotEqual,
            Operator::IsNull,
            Operator::IsNotNull,
        ],
        FieldKind::Select => vec![
            Operator::Equal,
            Operator::NotEqual,
            Operator::In,
            Operator::NotIn,
            Operator::IsNull,
            Operator::IsNotNull,
        ],
    }
}

/// Builds the query configuration for a reconciled property list plus the
/// built-in tag, reservation and owner columns every bucket carries. Tag and
/// owner choices come from the supplied collections; `select`-typed
/// properties resolve their value choices through `enums` (an unknown enum
/// id yields an empty choice list rather than an error).
pub fn build_config(
    properties: &[PropertyDefinition],
    tags: &[Tag],
    users: &[UserInfo],
    enums: &[DataEnum],
) -> QueryConfig {
    let mut config = QueryConfig::default();

    config.insert(FieldDefinition {
        path: TAG_COLUMN.to_string(),
        label: "Tag".to_string(),
        kind: FieldKind::Select,
        operators: operators_for(FieldKind::Select),
        choices: tags
            .iter()
            .map(|tag| FieldChoice {
                value: json!(tag.id),
                label: tag.name.clone(),
            })
            .collect(),
    });

    // The reservation flag is a non-nullable column, so the null checks do
    // not apply to it.
    config.insert(FieldDefinition {
        path: RESERVED_COLUMN.to_string(),
        label: "Reserved".to_string(),
        kind: FieldKind::Bool,
        operators: vec![Operator::Equal, Operator::NotEqual],
        choices: Vec::new(),
    });

    config.insert(FieldDefinition {
        path: OWNER_COLUMN.to_string(),
        label: "Reserved by".to_string(),
        kind: FieldKind::Select,
        operators: operators_for(FieldKind::Select),
        choices: users
            .iter()
            .map(|user| FieldChoice {
                value: json!(user.username),
                label: user.username.clone(),
            })
            .collect(),
    });

    for property in properties {
        let kind = field_kind(property.data_type);
        let choices = match (kind, property.enum_id) {
            (FieldKind::Select, Some(enum_id)) => enums
                .iter()
                .find(|item| item.id == enum_id)
                .map(|definition| {
                    definition
                        .items
                        .iter()
                        .map(|item| FieldChoice {
                            value: json!(item.value),
                            label: item.text.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        config.insert(FieldDefinition {
            path: property.path.clone(),
            label: property.title.clone(),
            kind,
            operators: operators_for(kind),
            choices,
        });
    }

    config
}
