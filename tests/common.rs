//! Common test utilities: sample catalogs, buckets and rows, plus a
//! scripted in-memory data client.
use async_trait::async_trait;
use jikko::prelude::*;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Stable uuids so tests can reference properties deterministically.
#[allow(dead_code)]
pub const STATUS_UUID: Uuid = Uuid::from_u128(0x1001);
#[allow(dead_code)]
pub const QUANTITY_UUID: Uuid = Uuid::from_u128(0x1002);
#[allow(dead_code)]
pub const GRADE_UUID: Uuid = Uuid::from_u128(0x1003);
#[allow(dead_code)]
pub const NOTE_UUID: Uuid = Uuid::from_u128(0x2001);

/// Properties defined by the sample class: a text status, a numeric
/// quantity and an enum-typed grade.
#[allow(dead_code)]
pub fn class_properties() -> Vec<PropertyDefinition> {
    vec![
        PropertyDefinition {
            uuid: STATUS_UUID,
            path: "$.status".to_string(),
            title: "Status".to_string(),
            data_type: PropertyType::String,
            enum_id: None,
        },
        PropertyDefinition {
            uuid: QUANTITY_UUID,
            path: "$.quantity".to_string(),
            title: "Quantity".to_string(),
            data_type: PropertyType::Numeric,
            enum_id: None,
        },
        PropertyDefinition {
            uuid: GRADE_UUID,
            path: "$.grade".to_string(),
            title: "Grade".to_string(),
            data_type: PropertyType::Select,
            enum_id: Some(1),
        },
    ]
}

/// An extra property contributed by tasks or filters.
#[allow(dead_code)]
pub fn note_property() -> PropertyDefinition {
    PropertyDefinition {
        uuid: NOTE_UUID,
        path: "$.note".to_string(),
        title: "Note".to_string(),
        data_type: PropertyType::String,
        enum_id: None,
    }
}

#[allow(dead_code)]
pub fn sample_bucket() -> Bucket {
    Bucket {
        id: 1,
        name: "shipments".to_string(),
        class_id: Some(10),
        tags_ids: vec![1, 2],
        tasks_ids: vec![5, 6],
        filters_ids: vec![7],
    }
}

/// A catalog with one class, two tags, two users, one enumeration, one
/// filter (id 7, `status == "open"`) and two tasks (id 5 references the
/// filter, id 6 does not).
#[allow(dead_code)]
pub fn sample_catalog() -> Catalog {
    Catalog {
        classes: vec![DataClass {
            id: 10,
            name: "Shipment".to_string(),
            configuration: class_properties(),
        }],
        tags: vec![
            Tag {
                id: 1,
                name: "Accepted".to_string(),
            },
            Tag {
                id: 2,
                name: "Rejected".to_string(),
            },
        ],
        users: vec![
            UserInfo {
                id: 1,
                username: "alice".to_string(),
            },
            UserInfo {
                id: 2,
                username: "bob".to_string(),
            },
        ],
        enums: vec![DataEnum {
            id: 1,
            name: "Grades".to_string(),
            items: vec![
                EnumItem {
                    value: "a".to_string(),
                    text: "Grade A".to_string(),
                },
                EnumItem {
                    value: "b".to_string(),
                    text: "Grade B".to_string(),
                },
            ],
        }],
        tasks: vec![
            Task {
                id: 5,
                name: "Tag open shipments".to_string(),
                filter_id: Some(7),
                configuration: TaskConfiguration {
                    actions: ActionDescriptor::Mutate {
                        set_tag: Some(TagAssignment { tag_id: 1 }),
                        set_reserved: None,
                        properties: vec![],
                    },
                    properties: vec![note_property()],
                },
            },
            Task {
                id: 6,
                name: "Remove everything".to_string(),
                filter_id: None,
                configuration: TaskConfiguration {
                    actions: ActionDescriptor::Remove,
                    properties: vec![],
                },
            },
        ],
        filters: vec![Filter {
            id: 7,
            name: "Open shipments".to_string(),
            configuration: FilterConfiguration {
                logic: Some(LogicExpression::new(
                    json!({"==": [{"var": "$.status"}, "open"]}),
                )),
                tree: None,
                properties: vec![note_property()],
            },
        }],
    }
}

/// A small fixed dataset exercising nulls, tags and reservation state.
#[allow(dead_code)]
pub fn sample_rows() -> Vec<DataRow> {
    vec![
        DataRow {
            id: 1,
            tag_id: Some(1),
            reserved: false,
            owner: None,
            properties: json!({"status": "open", "quantity": 10, "grade": "a"}),
        },
        DataRow {
            id: 2,
            tag_id: Some(2),
            reserved: true,
            owner: Some("alice".to_string()),
            properties: json!({"status": "closed", "quantity": 3}),
        },
        DataRow {
            id: 3,
            tag_id: None,
            reserved: false,
            owner: None,
            properties: json!({"status": "open", "quantity": 42, "grade": "b"}),
        },
        DataRow {
            id: 4,
            tag_id: Some(1),
            reserved: true,
            owner: Some("bob".to_string()),
            properties: json!({"quantity": 7, "grade": null}),
        },
    ]
}

/// A scripted count response: how long the "network" takes and what it
/// returns.
#[allow(dead_code)]
pub struct QueuedCount {
    pub delay: Duration,
    pub result: Result<u64, String>,
}

/// In-memory stand-in for the remote data store. Count queries consume the
/// scripted queue in order (falling back to `default_count`); every call is
/// recorded with the logic it was issued with and when it arrived.
#[allow(dead_code)]
pub struct MockDataClient {
    pub default_count: AtomicU64,
    queued_counts: Mutex<VecDeque<QueuedCount>>,
    pub count_calls: Mutex<Vec<(Option<LogicExpression>, Instant)>>,
    pub delete_calls: Mutex<Vec<Option<LogicExpression>>>,
    pub update_calls: Mutex<Vec<ModifyPayload>>,
    /// When set, delete/update calls fail with this message.
    pub fail_mutations: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl MockDataClient {
    pub fn new() -> Self {
        Self {
            default_count: AtomicU64::new(0),
            queued_counts: Mutex::new(VecDeque::new()),
            count_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            fail_mutations: Mutex::new(None),
        }
    }

    pub fn with_count(count: u64) -> Self {
        let client = Self::new();
        client.default_count.store(count, Ordering::SeqCst);
        client
    }

    pub fn queue_count(&self, delay: Duration, result: Result<u64, String>) {
        self.queued_counts
            .lock()
            .unwrap()
            .push_back(QueuedCount { delay, result });
    }

    pub fn fail_mutations_with(&self, message: &str) {
        *self.fail_mutations.lock().unwrap() = Some(message.to_string());
    }

    pub fn count_call_count(&self) -> usize {
        self.count_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DataClient for MockDataClient {
    async fn count_matches(
        &self,
        _bucket: &Bucket,
        logic: Option<&LogicExpression>,
    ) -> Result<u64, ApiError> {
        self.count_calls
            .lock()
            .unwrap()
            .push((logic.cloned(), Instant::now()));

        let queued = self.queued_counts.lock().unwrap().pop_front();
        match queued {
            Some(scripted) => {
                tokio::time::sleep(scripted.delay).await;
                scripted.result.map_err(|message| ApiError::Remote {
                    status: 500,
                    message,
                })
            }
            None => Ok(self.default_count.load(Ordering::SeqCst)),
        }
    }

    async fn delete_matching(
        &self,
        _bucket: &Bucket,
        logic: Option<&LogicExpression>,
    ) -> Result<MessageResponse, ApiError> {
        self.delete_calls.lock().unwrap().push(logic.cloned());
        match self.fail_mutations.lock().unwrap().clone() {
            Some(message) => Err(ApiError::Remote {
                status: 406,
                message,
            }),
            None => Ok(MessageResponse {
                message: "Removed 3 data row(s)".to_string(),
            }),
        }
    }

    async fn update_matching(
        &self,
        _bucket: &Bucket,
        payload: &ModifyPayload,
    ) -> Result<MessageResponse, ApiError> {
        self.update_calls.lock().unwrap().push(payload.clone());
        match self.fail_mutations.lock().unwrap().clone() {
            Some(message) => Err(ApiError::Remote {
                status: 406,
                message,
            }),
            None => Ok(MessageResponse {
                message: "Modified 5 data row(s)".to_string(),
            }),
        }
    }

    async fn reserve_matching(
        &self,
        _bucket: &Bucket,
        _logic: Option<&LogicExpression>,
        limit: u32,
        _target_owner: Option<&str>,
    ) -> Result<MessageResponse, ApiError> {
        Ok(MessageResponse {
            message: format!("Reserved {limit} data row(s)"),
        })
    }
}
