//! Customer resolution shared by the billing use cases

use crate::domain::entities::BillingCaller;
use crate::domain::repository::CustomerDirectory;
use crate::error::{BillingError, BillingResult};

/// Billing customer id of `caller`
///
/// Accounts without an email (guests) never have a customer.
pub(crate) async fn resolve_customer_id<D>(directory: &D, caller: &BillingCaller) -> BillingResult<String>
where
    D: CustomerDirectory + Send + Sync,
{
    let Some(email) = caller.email.as_deref() else {
        return Err(BillingError::CustomerNotFound);
    };

    directory
        .find_customer_id(email, &caller.access_token)
        .await?
        .filter(|id| !id.is_empty())
        .ok_or(BillingError::CustomerNotFound)
}
