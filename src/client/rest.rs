use super::{DataClient, DataGetRequest, DataPage, MessageResponse};
use crate::error::ApiError;
use crate::model::{Bucket, ModifyPayload};
use crate::rules::LogicExpression;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    logic: Option<LogicExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_owner_username: Option<String>,
}

/// HTTP client for the remote data-store API.
#[derive(Clone)]
pub struct RestDataClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl RestDataClient {
    /// Creates a client against `base_url` with the transport's default
    /// timeout behavior.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: Self::trim_base(base_url),
            headers: HeaderMap::new(),
        })
    }

    /// Creates a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: Self::trim_base(base_url),
            headers: HeaderMap::new(),
        })
    }

    /// Attaches a bearer token sent with every request.
    pub fn with_bearer_token(mut self, token: &str) -> Result<Self, ApiError> {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|error| ApiError::Config(format!("invalid bearer token: {error}")))?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    fn trim_base(base_url: impl Into<String>) -> String {
        base_url.into().trim_end_matches('/').to_string()
    }

    fn data_url(&self, bucket: &Bucket, suffix: &str) -> String {
        format!("{}/api/bucket/{}/data{}", self.base_url, bucket.name, suffix)
    }

    /// Decodes a successful body, or surfaces the server's `message` field
    /// verbatim for error responses.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<MessageResponse>().await {
            Ok(body) => body.message,
            Err(_) => format!("request failed with status {status}"),
        };
        Err(ApiError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DataClient for RestDataClient {
    async fn count_matches(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
    ) -> Result<u64, ApiError> {
        let body = DataGetRequest {
            logic: logic.cloned(),
        };
        let response = self
            .client
            .post(self.data_url(bucket, "/get"))
            .headers(self.headers.clone())
            .query(&[("limit", "0")])
            .json(&body)
            .send()
            .await?;
        let page: DataPage = self.parse_response(response).await?;
        Ok(page.total)
    }

    async fn delete_matching(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
    ) -> Result<MessageResponse, ApiError> {
        let body = DataGetRequest {
            logic: logic.cloned(),
        };
        let response = self
            .client
            .delete(self.data_url(bucket, ""))
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn update_matching(
        &self,
        bucket: &Bucket,
        payload: &ModifyPayload,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .client
            .put(self.data_url(bucket, ""))
            .headers(self.headers.clone())
            .json(payload)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn reserve_matching(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
        limit: u32,
        target_owner: Option<&str>,
    ) -> Result<MessageResponse, ApiError> {
        let body = ReserveRequest {
            logic: logic.cloned(),
            target_owner_username: target_owner.map(str::to_string),
        };
        let response = self
            .client
            .post(self.data_url(bucket, "/reserve"))
            .headers(self.headers.clone())
            .query(&[("limit", limit.to_string())])
            .json(&body)
            .send()
            .await?;
        self.parse_response(response).await
    }
}
