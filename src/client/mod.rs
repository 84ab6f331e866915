pub mod rest;

pub use rest::RestDataClient;

use crate::error::ApiError;
use crate::model::{Bucket, ModifyPayload};
use crate::rules::LogicExpression;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body for count and list queries against a bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataGetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicExpression>,
}

/// Paged query response. A count-only query (`limit=0`) populates `total`
/// and omits the rows.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPage {
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Human-readable summary returned by mutating endpoints, e.g.
/// `"Removed 3 data row(s)"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// The remote data-store operations this core depends on. Mutations apply
/// atomically on the remote side: a request either modifies every matching
/// row or none.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Counts the rows matching a logic expression without returning them.
    /// `None` matches every row.
    async fn count_matches(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
    ) -> Result<u64, ApiError>;

    /// Deletes every row matching the logic expression.
    async fn delete_matching(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
    ) -> Result<MessageResponse, ApiError>;

    /// Applies a bulk modification to every row matching the payload's
    /// logic expression.
    async fn update_matching(
        &self,
        bucket: &Bucket,
        payload: &ModifyPayload,
    ) -> Result<MessageResponse, ApiError>;

    /// Reserves up to `limit` matching rows, for the calling user or for
    /// `target_owner` when set.
    async fn reserve_matching(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
        limit: u32,
        target_owner: Option<&str>,
    ) -> Result<MessageResponse, ApiError>;
}
