//! reqwest-backed Shopify Admin API client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::manifest::OrderNumber;

use super::types::{
    ApiError, CancelRequest, Order, OrderEnvelope, OrderId, OrdersApi, OrdersEnvelope,
    Transaction, TransactionEnvelope, TransactionId, TransactionsEnvelope, VoidRequest,
    VoidTransaction,
};

/// Shopify Admin REST client.
///
/// Authenticates with HTTP basic auth using the configured key/secret
/// (the header form of the legacy key:secret@host convention).
pub struct ShopifyClient {
    client: Client,
    config: ApiConfig,
}

impl ShopifyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build an Admin API URL for the given resource path.
    fn build_url(&self, path: &str) -> String {
        format!(
            "https://{}.myshopify.com/admin/api/{}/{}",
            self.config.shop, self.config.api_version, path
        )
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.config.key, Some(&self.config.secret))
    }

    /// Send a request and decode the JSON response, classifying failures.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.authed(builder).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OrdersApi for ShopifyClient {
    async fn order_by_number(&self, number: OrderNumber) -> Result<Vec<Order>, ApiError> {
        let url = self.build_url("orders.json");
        debug!(order_number = number, "Looking up order");

        let name = number.to_string();
        let envelope: OrdersEnvelope = self
            .execute(
                self.client
                    .get(&url)
                    .query(&[("status", "any"), ("name", name.as_str())]),
            )
            .await?;

        Ok(envelope.orders)
    }

    async fn transactions(&self, order_id: OrderId) -> Result<Vec<Transaction>, ApiError> {
        let url = self.build_url(&format!("orders/{}/transactions.json", order_id));
        debug!(order_id = order_id, "Fetching transactions");

        let envelope: TransactionsEnvelope = self.execute(self.client.get(&url)).await?;
        Ok(envelope.transactions)
    }

    async fn create_void(
        &self,
        order_id: OrderId,
        parent_id: TransactionId,
        currency: &str,
    ) -> Result<Transaction, ApiError> {
        let url = self.build_url(&format!("orders/{}/transactions.json", order_id));
        debug!(order_id = order_id, parent_id = parent_id, "Voiding authorization");

        let body = VoidRequest {
            transaction: VoidTransaction {
                kind: "void",
                currency,
                parent_id,
            },
        };

        let envelope: TransactionEnvelope =
            self.execute(self.client.post(&url).json(&body)).await?;
        Ok(envelope.transaction)
    }

    async fn cancel_order(
        &self,
        order_id: OrderId,
        notify_customer: bool,
    ) -> Result<Order, ApiError> {
        let url = self.build_url(&format!("orders/{}/cancel.json", order_id));
        debug!(order_id = order_id, "Cancelling order");

        let body = CancelRequest {
            email: notify_customer,
        };

        let envelope: OrderEnvelope = self.execute(self.client.post(&url).json(&body)).await?;
        Ok(envelope.order)
    }
}
