//! REST gateway over a `/todos` collection.

use super::{GatewayError, GatewayFuture, TodoGateway};
use crate::types::{Item, ItemId, ItemPatch, NewItem, UserId};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Create body: the submitted item plus the owner
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    #[serde(flatten)]
    item: &'a NewItem,
    user_id: UserId,
}

/// HTTP client for the remote collection
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    owner: UserId,
}

impl HttpGateway {
    /// Create a gateway for `base_url` scoped to `owner`
    #[must_use]
    pub fn new(base_url: impl Into<String>, owner: UserId) -> Self {
        Self::with_client(Client::new(), base_url, owner)
    }

    /// Create a gateway reusing an existing client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>, owner: UserId) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            owner,
        }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    async fn list(&self) -> Result<Vec<Item>, GatewayError> {
        let url = format!("{}/todos?userId={}", self.base_url, self.owner);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        decode(response).await
    }

    async fn create(&self, item: NewItem) -> Result<Item, GatewayError> {
        let url = format!("{}/todos", self.base_url);
        tracing::debug!(%url, title = %item.title, "POST");

        let body = CreateBody {
            item: &item,
            user_id: self.owner,
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        decode(response).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), GatewayError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "DELETE");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        check_status(response).await.map(|_| ())
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item, GatewayError> {
        let url = self.item_url(id);
        tracing::debug!(%url, ?patch, "PATCH");

        let response = self
            .client
            .patch(&url)
            .json(&patch)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        decode(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), %message, "Request rejected");
    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

impl TodoGateway for HttpGateway {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn list_items(&self) -> GatewayFuture<'_, Vec<Item>> {
        Box::pin(self.list())
    }

    fn create_item(&self, item: NewItem) -> GatewayFuture<'_, Item> {
        Box::pin(self.create(item))
    }

    fn delete_item(&self, id: ItemId) -> GatewayFuture<'_, ()> {
        Box::pin(self.delete(id))
    }

    fn update_item(&self, id: ItemId, patch: ItemPatch) -> GatewayFuture<'_, Item> {
        Box::pin(self.update(id, patch))
    }
}
