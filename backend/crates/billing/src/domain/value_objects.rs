//! Billing value objects

use derive_more::Display;
use serde::Serialize;

/// Billing cycle offered on the pricing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[display("month")]
    Month,
    #[display("year")]
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingFrequency {
    pub id: BillingCycle,
    pub name: &'static str,
    /// Percent off versus paying monthly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
}

pub const BILLING_FREQUENCIES: [BillingFrequency; 2] = [
    BillingFrequency {
        id: BillingCycle::Month,
        name: "Monthly",
        discount: None,
    },
    BillingFrequency {
        id: BillingCycle::Year,
        name: "Yearly",
        discount: Some(20),
    },
];
