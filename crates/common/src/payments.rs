use serde::{Deserialize, Serialize};

/// Chain epochs per day, at 30 second epochs. Rate allowances are
/// denominated per epoch, so lockup burn per day is rate * this.
pub const EPOCHS_PER_DAY: u64 = 2880;

/// Current storage pricing, as quoted by the payments service
///
/// All token quantities are in the payment token's smallest (atto)
/// unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRates {
    /// Cost of storing one GiB for one epoch
    pub price_per_gib_per_epoch: u128,
}

/// Balance and allowance state for a requested capacity and
/// persistence period, as quoted by the payments service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceSnapshot {
    /// Per-epoch rate required for the requested capacity
    pub rate_needed: u128,
    /// Per-epoch rate currently consumed by existing storage
    pub rate_used: u128,
    /// Per-epoch rate the account has approved
    pub rate_allowance: u128,
    /// Lockup required to cover the requested period
    pub lockup_needed: u128,
    /// Lockup already committed to existing storage
    pub lockup_used: u128,
    /// Total lockup the account has approved
    pub lockup_allowance: u128,
    /// Deposit shortfall for the requested capacity and period
    pub deposit_needed: u128,
}

impl AllowanceSnapshot {
    /// Lockup still available to burn down, saturating at zero
    pub fn lockup_remaining(&self) -> u128 {
        self.lockup_allowance.saturating_sub(self.lockup_used)
    }
}
