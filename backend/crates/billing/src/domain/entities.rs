//! Billing entities
//!
//! Only the fields this service reads are typed; everything else the
//! billing provider returns is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Subscription {
    pub fn belongs_to(&self, customer_id: &str) -> bool {
        self.customer_id.as_deref() == Some(customer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    /// Provider's estimate of the whole collection
    pub total_records: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
            total_records: 0,
        }
    }
}

/// Who is asking: the signed-in user's email and bearer token
#[derive(Clone)]
pub struct BillingCaller {
    pub email: Option<String>,
    pub access_token: String,
}

impl std::fmt::Debug for BillingCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingCaller")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
