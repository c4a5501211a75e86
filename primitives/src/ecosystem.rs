//! Ecosystem Constants
//!
//! Pallet ids and the economic parameters of recurring-order settlement. Runtime
//! configurations read their defaults from here.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Recurring Orders pallet ID (custody of deposited funds)
  pub const RECURRING_ORDERS_PALLET_ID: &[u8; 8] = b"recurord";
}

/// Settlement parameters.
pub mod params {
  use super::Balance;

  /// Fixed-point scale of pro-rata weights (10^18).
  ///
  /// A subscriber's weight is `amount_in * PRECISION / total_amount_in`, and the
  /// share is `pool * weight / PRECISION`, both floored.
  pub const PRECISION: Balance = 1_000_000_000_000_000_000;

  /// Denominator of the swap fee, expressed in basis points.
  pub const BASIS_POINTS_DENOMINATOR: Balance = 10_000;

  /// Swap fee charged on every settlement (0.3%).
  pub const DEFAULT_SWAP_FEE_BASIS_POINTS: u16 = 30;

  /// Native fee for a pair created by a non-admin account (1.0 at 12 decimals).
  pub const DEFAULT_PAIR_CREATION_FEE: Balance = 1_000_000_000_000;

  /// Minimum seconds between two settlements of the same pair (one day).
  pub const TRIGGER_FREQUENCY_SECS: u64 = 86_400;

  /// Upper bound on subscribers per pair, which bounds the work of one trigger.
  pub const MAX_SUBSCRIBERS_PER_PAIR: u32 = 512;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pallet_ids_are_correct_length() {
    assert_eq!(pallet_ids::RECURRING_ORDERS_PALLET_ID.len(), 8);
  }

  #[test]
  fn default_swap_fee_is_below_half_of_output() {
    // fee is taken twice from the output
    let double_fee = 2 * params::DEFAULT_SWAP_FEE_BASIS_POINTS as Balance;
    assert!(double_fee < params::BASIS_POINTS_DENOMINATOR);
  }

  #[test]
  fn precision_is_standard() {
    assert_eq!(params::PRECISION, 10u128.pow(18));
  }
}
