use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::client::{PaymentsClient, StorageClient, VerifierClient};
use crate::payments::{AllowanceSnapshot, CostRates, EPOCHS_PER_DAY};
use crate::session::Session;
use crate::sizing::resolve_size_info;

/// What the caller wants to sustain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SufficiencyParams {
    /// Capacity the allowances should cover, in bytes
    pub capacity_bytes: u64,
    /// Desired persistence period, in days
    pub period_days: u64,
    /// Minimum acceptable days of remaining lockup runway
    pub min_days_threshold: u64,
}

/// Judgment of whether current allowances can sustain the requested
/// storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSufficiency {
    pub rate_needed: u128,
    pub rate_used: u128,
    pub rate_allowance: u128,
    /// Bytes currently stored across all of the account's data sets
    pub current_storage_bytes: u64,
    pub current_storage_gib: f64,
    pub lockup_needed: u128,
    pub lockup_used: u128,
    pub lockup_allowance: u128,
    pub lockup_remaining: u128,
    pub deposit_needed: u128,
    /// Days the remaining lockup lasts at the requested rate
    pub persistence_days_left: f64,
    /// Days the remaining lockup lasts at the rate currently in
    /// use. Infinite when nothing is burning lockup.
    pub persistence_days_left_at_current_rate: f64,
    pub is_rate_sufficient: bool,
    pub is_lockup_sufficient: bool,
    pub is_sufficient: bool,
    /// GiB of storage the current rate allowance could pay for
    pub rate_allowance_gib: f64,
}

/// Judge whether the account's allowances can sustain the requested
/// capacity for at least `min_days_threshold` days
///
/// Fails closed: any upstream cost, allowance, or listing error
/// propagates to the caller. A sufficiency judgment built on
/// partial inputs would not be meaningful.
pub async fn check_storage_sufficiency<S, V, P>(
    session: &Session,
    storage: &S,
    verifier: &V,
    payments: &P,
    params: &SufficiencyParams,
) -> Result<StorageSufficiency>
where
    S: StorageClient,
    V: VerifierClient,
    P: PaymentsClient,
{
    let rates = payments
        .cost_rates()
        .await
        .map_err(|e| anyhow!("failed to fetch cost rates: {}", e))?;
    let allowances = payments
        .allowance_state(params.capacity_bytes, params.period_days)
        .await
        .map_err(|e| anyhow!("failed to fetch allowance state: {}", e))?;

    let datasets = storage
        .list_datasets(&session.account)
        .await
        .map_err(|e| anyhow!("failed to list data sets: {}", e))?;
    let sizes = resolve_size_info(verifier, &datasets).await;
    let current_storage_bytes: u64 = sizes.values().map(|size| size.size_bytes).sum();
    let current_storage_gib: f64 = sizes.values().map(|size| size.size_gib).sum();

    let sufficiency = evaluate_sufficiency(
        &rates,
        &allowances,
        current_storage_bytes,
        current_storage_gib,
        params,
    );
    tracing::debug!(
        "sufficiency for {}: rate {} lockup {} ({} day(s) left)",
        session.account,
        sufficiency.is_rate_sufficient,
        sufficiency.is_lockup_sufficient,
        sufficiency.persistence_days_left
    );
    Ok(sufficiency)
}

/// The pure arithmetic behind `check_storage_sufficiency`
pub fn evaluate_sufficiency(
    rates: &CostRates,
    allowances: &AllowanceSnapshot,
    current_storage_bytes: u64,
    current_storage_gib: f64,
    params: &SufficiencyParams,
) -> StorageSufficiency {
    let lockup_per_day = EPOCHS_PER_DAY as u128 * allowances.rate_needed;
    let lockup_per_day_at_current_rate = EPOCHS_PER_DAY as u128 * allowances.rate_used;
    let lockup_remaining = allowances.lockup_remaining();

    let persistence_days_left = days_of_runway(lockup_remaining, lockup_per_day);
    let persistence_days_left_at_current_rate =
        days_of_runway(lockup_remaining, lockup_per_day_at_current_rate);

    let is_rate_sufficient = allowances.rate_allowance >= allowances.rate_needed;
    let is_lockup_sufficient = persistence_days_left >= params.min_days_threshold as f64;

    let rate_allowance_gib = if rates.price_per_gib_per_epoch > 0 {
        allowances.rate_allowance as f64 / rates.price_per_gib_per_epoch as f64
    } else {
        0.0
    };

    StorageSufficiency {
        rate_needed: allowances.rate_needed,
        rate_used: allowances.rate_used,
        rate_allowance: allowances.rate_allowance,
        current_storage_bytes,
        current_storage_gib,
        lockup_needed: allowances.lockup_needed,
        lockup_used: allowances.lockup_used,
        lockup_allowance: allowances.lockup_allowance,
        lockup_remaining,
        deposit_needed: allowances.deposit_needed,
        persistence_days_left,
        persistence_days_left_at_current_rate,
        is_rate_sufficient,
        is_lockup_sufficient,
        is_sufficient: is_rate_sufficient && is_lockup_sufficient,
        rate_allowance_gib,
    }
}

/// Days until `remaining` lockup is burned at `per_day`
///
/// A zero burn rate with lockup still remaining is unbounded
/// runway, not a division error; zero remaining is zero days.
fn days_of_runway(remaining: u128, per_day: u128) -> f64 {
    if per_day > 0 {
        remaining as f64 / per_day as f64
    } else if remaining > 0 {
        f64::INFINITY
    } else {
        0.0
    }
}
