//! Paddle Billing API client

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::config::BillingConfig;
use crate::domain::entities::{Page, Subscription, Transaction};
use crate::domain::repository::BillingProvider;
use crate::error::{BillingError, BillingResult};

const SERVICE: &str = "paddle";
const PADDLE_VERSION: &str = "1";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    estimated_total: u64,
}

impl<T> Envelope<Vec<T>> {
    fn into_page(self) -> Page<T> {
        let (has_more, total_records) = self
            .meta
            .pagination
            .map(|p| (p.has_more, p.estimated_total))
            .unwrap_or((false, 0));

        Page {
            items: self.data,
            has_more,
            total_records,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    detail: String,
}

#[derive(Clone)]
pub struct PaddleClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for PaddleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaddleClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PaddleClient {
    pub fn new(config: &BillingConfig) -> BillingResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.paddle_api_url.clone(),
            api_key: config.paddle_api_key.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> BillingResult<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .bearer_auth(&self.api_key)
            .header("Paddle-Version", PADDLE_VERSION)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn ensure_success(response: Response) -> BillingResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => format!("{}: {}", envelope.error.code, envelope.error.detail),
            Err(_) => body,
        };

        Err(BillingError::Upstream {
            service: SERVICE,
            status,
            detail,
        })
    }
}

impl BillingProvider for PaddleClient {
    async fn list_subscriptions(&self, customer_id: &str, per_page: u32) -> BillingResult<Page<Subscription>> {
        let per_page = per_page.to_string();
        let envelope: Envelope<Vec<Subscription>> = self
            .get(
                "/subscriptions",
                &[("customer_id", customer_id), ("per_page", &per_page)],
            )
            .await?;
        Ok(envelope.into_page())
    }

    async fn get_subscription(&self, subscription_id: &str) -> BillingResult<Option<Subscription>> {
        let path = format!("/subscriptions/{subscription_id}");
        match self
            .get::<Envelope<Subscription>>(&path, &[("include", "next_transaction")])
            .await
        {
            Ok(envelope) => Ok(Some(envelope.data)),
            Err(BillingError::Upstream { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn list_transactions(&self, customer_id: &str, per_page: u32) -> BillingResult<Page<Transaction>> {
        let per_page = per_page.to_string();
        let envelope: Envelope<Vec<Transaction>> = self
            .get(
                "/transactions",
                &[("customer_id", customer_id), ("per_page", &per_page)],
            )
            .await?;
        Ok(envelope.into_page())
    }
}
