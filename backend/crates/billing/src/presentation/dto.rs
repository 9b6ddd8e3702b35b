//! API DTOs (Data Transfer Objects)
//!
//! Lists answer `{ data, hasMore, totalRecords, error? }`; a single
//! subscription answers `{ data?, error? }`. Failures use the same shapes
//! with an empty `data`.

use serde::Serialize;

use crate::domain::entities::{Page, Subscription};

/// Collection response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub has_more: bool,
    pub total_records: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ListResponse<T> {
    pub fn failed(message: &str) -> Self {
        Self {
            data: Vec::new(),
            has_more: false,
            total_records: 0,
            error: Some(message.to_string()),
        }
    }
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            has_more: page.has_more,
            total_records: page.total_records,
            error: None,
        }
    }
}

/// Single subscription response
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionDetailResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Subscription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubscriptionDetailResponse {
    pub fn found(subscription: Subscription) -> Self {
        Self {
            data: Some(subscription),
            error: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            data: None,
            error: Some(message.to_string()),
        }
    }
}
