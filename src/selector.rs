use crate::error::SelectError;
use crate::model::{ActionDescriptor, Bucket, Catalog, PropertyDefinition, Task, merge_properties};
use crate::rules::{LogicExpression, QueryConfig, RuleNode, build_config, initial_tree, to_logic};

/// Dialog state seeded from a task template: the action to run, the
/// reconciled properties, the rebuilt query configuration and the rule tree
/// with its derived logic.
#[derive(Debug, Clone)]
pub struct TaskSelection {
    pub actions: ActionDescriptor,
    pub logic: Option<LogicExpression>,
    pub tree: RuleNode,
    pub properties: Vec<PropertyDefinition>,
    pub config: QueryConfig,
}

/// Seeds dialog state from a task. When the task references a filter, the
/// filter is resolved through the catalog, its properties join the merge and
/// its stored logic/tree seed the rule builder; otherwise the tree starts as
/// the empty matches-all group.
pub fn select_task(
    task: &Task,
    bucket: &Bucket,
    catalog: &Catalog,
) -> Result<TaskSelection, SelectError> {
    let class_properties = catalog.class_properties(bucket)?;
    let bucket_tags = catalog.bucket_tags(bucket);

    let (properties, stored_logic, stored_tree) = match task.filter_id {
        Some(filter_id) => {
            let filter = catalog
                .filter(filter_id)
                .ok_or(SelectError::FilterNotFound(filter_id))?;
            let properties = merge_properties(
                &class_properties,
                &task.configuration.properties,
                &filter.configuration.properties,
            );
            (
                properties,
                filter.configuration.logic.clone(),
                filter.configuration.tree.clone(),
            )
        }
        None => {
            let properties =
                merge_properties(&class_properties, &task.configuration.properties, &[]);
            (properties, None, None)
        }
    };

    let config = build_config(&properties, &bucket_tags, &catalog.users, &catalog.enums);
    let checked = initial_tree(stored_logic.as_ref(), stored_tree.as_ref(), &config);
    // Recompute rather than reuse the stored logic, so the predicate always
    // agrees with the validated tree.
    let logic = to_logic(&checked.tree);

    Ok(TaskSelection {
        actions: task.configuration.actions.clone(),
        logic,
        tree: checked.tree,
        properties,
        config,
    })
}
