use polkadot_sdk::frame_support::pallet_prelude::*;
use primitives::AssetKind;
use scale_info::prelude::vec::Vec;

/// Sequential pair identifier, the first pair gets `1`
pub type PairId = u32;

/// A directional trading route with its own settlement clock.
#[derive(Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo)]
pub struct PairInfo<Balance> {
  pub id: PairId,
  pub asset_in: AssetKind,
  pub asset_out: AssetKind,
  /// Unix seconds of the last settlement, `None` until the first one
  pub last_triggered_at: Option<u64>,
  /// Native fee charged at creation, zero for admin-created pairs
  pub creation_fee_paid: Balance,
}

/// A standing order of one owner against one pair.
#[derive(Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo)]
pub struct SubscriptionInfo<Balance> {
  /// Amount of `asset_in` sold at every settlement
  pub amount_in: Balance,
  /// Index of the owner in the pair's subscriber list
  pub slot: u32,
  /// Native bond held for the membership
  pub deposit: Balance,
}

/// Snapshot of who takes part in the next settlement of a pair.
///
/// `slots` mirrors the subscriber list one to one. A slot is `None` when its
/// owner's order is zero or not covered by their deposited balance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EligibleSet<AccountId, Balance> {
  pub slots: Vec<Option<(AccountId, Balance)>>,
  pub total_amount_in: Balance,
  pub eligible_count: u32,
}

impl<AccountId, Balance: Copy> EligibleSet<AccountId, Balance> {
  /// Eligible owners with their order sizes, in list order
  pub fn orders(&self) -> impl Iterator<Item = (&AccountId, Balance)> {
    self.slots.iter().flatten().map(|(owner, amount)| (owner, *amount))
  }
}

/// A pair together with its subscriber list, as returned by `all_pairs`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairSummary<AccountId, Balance> {
  pub info: PairInfo<Balance>,
  pub subscribers: Vec<AccountId>,
}

/// Exchange used to settle a batch
pub trait SwapExecutor<AccountId, Balance> {
  /// Sell exactly `amount_in` of `path[0]` for `path[last]`, returning the amount received.
  fn swap_exact_tokens_for_tokens(
    who: AccountId,
    path: Vec<AssetKind>,
    amount_in: Balance,
    min_amount_out: Balance,
    recipient: AccountId,
    keep_alive: bool,
  ) -> Result<Balance, DispatchError>;
}

impl<AccountId, Balance> SwapExecutor<AccountId, Balance> for () {
  fn swap_exact_tokens_for_tokens(
    _who: AccountId,
    _path: Vec<AssetKind>,
    _amount_in: Balance,
    _min_amount_out: Balance,
    _recipient: AccountId,
    _keep_alive: bool,
  ) -> Result<Balance, DispatchError> {
    Err(DispatchError::Other("No swap executor configured"))
  }
}

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId, Balance> {
  /// Two distinct assets the runtime can hold and exchange
  fn trading_pair() -> (AssetKind, AssetKind);
  fn ensure_funded(who: &AccountId, asset: AssetKind, amount: Balance) -> DispatchResult;
  /// Make `asset_in -> asset_out` swappable through the configured executor
  fn prepare_exchange(asset_in: AssetKind, asset_out: AssetKind) -> DispatchResult;
}
