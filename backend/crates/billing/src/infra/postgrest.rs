//! Customer directory over the identity backend's REST API
//!
//! Reads the `customers` table with the user's own token, so row-level
//! security limits the lookup to the caller's rows.

use reqwest::Client;
use serde::Deserialize;

use crate::application::config::BillingConfig;
use crate::domain::repository::CustomerDirectory;
use crate::error::{BillingError, BillingResult};

const SERVICE: &str = "customer directory";

#[derive(Debug, Deserialize)]
struct CustomerRow {
    customer_id: Option<String>,
}

#[derive(Clone)]
pub struct PostgrestCustomerDirectory {
    http: Client,
    rest_url: String,
    anon_key: String,
}

impl std::fmt::Debug for PostgrestCustomerDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestCustomerDirectory")
            .field("rest_url", &self.rest_url)
            .finish_non_exhaustive()
    }
}

impl PostgrestCustomerDirectory {
    pub fn new(config: &BillingConfig) -> BillingResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            rest_url: config.rest_api_url(),
            anon_key: config.anon_key.clone(),
        })
    }
}

impl CustomerDirectory for PostgrestCustomerDirectory {
    async fn find_customer_id(&self, email: &str, access_token: &str) -> BillingResult<Option<String>> {
        let filter = format!("eq.{email}");
        let response = self
            .http
            .get(format!("{}/customers", self.rest_url))
            .query(&[("select", "customer_id,email"), ("email", filter.as_str())])
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(BillingError::Upstream {
                service: SERVICE,
                status,
                detail,
            });
        }

        let rows: Vec<CustomerRow> = response.json().await?;
        Ok(rows.into_iter().find_map(|row| row.customer_id))
    }
}
