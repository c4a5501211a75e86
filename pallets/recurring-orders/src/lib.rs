//! Recurring Orders Pallet
//!
//! Custodial ledger for recurring swaps. Owners deposit funds, subscribe a fixed
//! order size to a directional asset pair, and anyone may trigger a pair once per
//! `TriggerFrequency`. A trigger sells every covered order in one swap and splits
//! the proceeds pro-rata.
//!
//! ## Settlement
//!
//! For a batch with total input `S` and swap output `out`:
//! - `fee = floor(out * bps / 10_000)` is paid to the fee recipient
//! - the pool `D = out - 2 * fee` is shared as `floor(D * floor(a * P / S) / P)`
//! - the embedded fee and the rounding dust stay on the pallet's own ledger entry
//!
//! `P` is [`primitives::ecosystem::params::PRECISION`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod distribution;
pub mod types;
pub use types::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::recurring-orders";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use crate::distribution;
  use crate::types::{EligibleSet, PairId, PairInfo, PairSummary, SubscriptionInfo, SwapExecutor};
  use alloc::{vec, vec::Vec};
  use frame::deps::{
    frame_support::storage::with_storage_layer,
    frame_support::traits::{
      UnixTime,
      fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
      fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
      tokens::Preservation,
    },
    sp_runtime::{DispatchError, traits::AccountIdConversion},
  };
  use frame::prelude::*;
  use primitives::{AssetInspector, AssetKind, Balance};

  /// Configuration trait for the recurring orders pallet
  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// The assets pallet holding `AssetKind::Local` and `AssetKind::Foreign` deposits
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// The currency holding `AssetKind::Native` deposits
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Exchange that settles a batch in a single call
    type SwapExecutor: SwapExecutor<Self::AccountId, Balance>;

    /// Wall clock for the trigger throttle
    type TimeProvider: UnixTime;

    /// Origin allowed to set fees and collaborators and to withdraw protocol fees.
    /// It also creates pairs without paying the creation fee.
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID of the custody account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Minimum seconds between two settlements of a pair
    #[pallet::constant]
    type TriggerFrequency: Get<u64>;

    /// Maximum number of subscribers a pair can hold
    #[pallet::constant]
    type MaxSubscribersPerPair: Get<u32>;

    /// Swap fee in basis points until the admin sets one
    #[pallet::constant]
    type DefaultSwapFeeBasisPoints: Get<u16>;

    /// Native pair creation fee until the admin sets one
    #[pallet::constant]
    type DefaultPairCreationFee: Get<Balance>;

    /// Native bond taken from the owner's ledger for every pair membership.
    /// Returned when the subscription is removed.
    #[pallet::constant]
    type SubscriptionDeposit: Get<Balance>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId, Balance>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Deposited balance per owner and asset
  #[pallet::storage]
  pub type Deposits<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    AssetKind,
    Balance,
    ValueQuery,
  >;

  /// Last issued pair id
  #[pallet::storage]
  #[pallet::getter(fn pair_count)]
  pub type PairCount<T> = StorageValue<_, PairId, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn pairs)]
  pub type Pairs<T: Config> = StorageMap<_, Blake2_128Concat, PairId, PairInfo<Balance>, OptionQuery>;

  /// Directional index `(asset_in, asset_out) -> id`
  #[pallet::storage]
  pub type PairIdByAssets<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    AssetKind,
    Blake2_128Concat,
    AssetKind,
    PairId,
    OptionQuery,
  >;

  /// Subscriber list per pair, in settlement order
  #[pallet::storage]
  pub type PairSubscribers<T: Config> = StorageMap<
    _,
    Blake2_128Concat,
    PairId,
    BoundedVec<T::AccountId, T::MaxSubscribersPerPair>,
    ValueQuery,
  >;

  #[pallet::storage]
  pub type Subscriptions<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    PairId,
    Blake2_128Concat,
    T::AccountId,
    SubscriptionInfo<Balance>,
    OptionQuery,
  >;

  #[pallet::storage]
  #[pallet::getter(fn swap_fee_basis_points)]
  pub type SwapFeeBasisPoints<T: Config> =
    StorageValue<_, u16, ValueQuery, T::DefaultSwapFeeBasisPoints>;

  #[pallet::storage]
  #[pallet::getter(fn pair_creation_fee)]
  pub type PairCreationFee<T: Config> =
    StorageValue<_, Balance, ValueQuery, T::DefaultPairCreationFee>;

  /// Receives the direct swap fee and withdrawn protocol fees
  #[pallet::storage]
  #[pallet::getter(fn fee_recipient)]
  pub type FeeRecipient<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Intermediate asset of two-hop swap paths
  #[pallet::storage]
  #[pallet::getter(fn hub_asset)]
  pub type HubAsset<T> = StorageValue<_, AssetKind, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Funds moved into custody
    Deposited {
      owner: T::AccountId,
      asset: AssetKind,
      amount: Balance,
    },
    /// Funds moved out of custody
    Withdrawn {
      owner: T::AccountId,
      asset: AssetKind,
      amount: Balance,
    },
    PairCreated {
      pair_id: PairId,
      asset_in: AssetKind,
      asset_out: AssetKind,
    },
    /// A subscription was created, changed or removed (`amount_in == 0`)
    SubscriptionEdited {
      pair_id: PairId,
      owner: T::AccountId,
      amount_in: Balance,
    },
    /// A batch was swapped and distributed
    Settled {
      pair_id: PairId,
      last_triggered_at: u64,
      total_amount_in: Balance,
      total_amount_out: Balance,
      fee: Balance,
      participants: u32,
    },
    FeesUpdated {
      swap_fee_basis_points: u16,
      pair_creation_fee: Balance,
    },
    CollaboratorsUpdated {
      fee_recipient: Option<T::AccountId>,
      hub_asset: AssetKind,
    },
    /// Protocol balance paid out to the fee recipient
    FeesWithdrawn {
      asset: AssetKind,
      amount: Balance,
      recipient: T::AccountId,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Input and output asset are the same
    IdenticalAssets,
    /// The pair already exists in this direction
    PairExists,
    /// Offered creation fee is below the current one
    InsufficientFee,
    NoPairFound,
    NoSubscriptionFound,
    /// The pair was settled less than `TriggerFrequency` seconds ago
    TooSoon,
    /// Deposited balance does not cover the amount
    InsufficientBalance,
    /// The owner's own account could not fund the transfer
    InsufficientExternalBalance,
    ZeroAmount,
    /// Swap fee does not fit in 16 bits
    InvalidFeeValue,
    NothingToWithdraw,
    NoFeeRecipient,
    TooManySubscribers,
    /// No subscriber's deposit covers their order
    NoEligibleSubscriptions,
    SwapFailed,
    /// Twice the fee is larger than the swap output
    FeeExceedsOutput,
    Overflow,
    /// Native deposit does not cover the membership bond
    InsufficientSubscriptionDeposit,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub fee_recipient: Option<T::AccountId>,
    pub hub_asset: AssetKind,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some(recipient) = &self.fee_recipient {
        FeeRecipient::<T>::put(recipient);
      }
      HubAsset::<T>::put(self.hub_asset);
      // Custody survives a zero native balance
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Move `amount` of `asset` from the caller into custody.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(origin: OriginFor<T>, asset: AssetKind, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_deposit(&who, asset, amount)
    }

    /// Deposit the native currency. It trades as `AssetKind::Native` directly.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::deposit_native())]
    pub fn deposit_native(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_deposit(&who, AssetKind::Native, amount)
    }

    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::withdraw())]
    pub fn withdraw(origin: OriginFor<T>, asset: AssetKind, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(amount > 0, Error::<T>::ZeroAmount);
      Self::debit(&who, asset, amount)?;
      Self::transfer_asset(
        asset,
        &Self::account_id(),
        &who,
        amount,
        Preservation::Expendable,
      )?;
      Self::deposit_event(Event::Withdrawn {
        owner: who,
        asset,
        amount,
      });
      Ok(())
    }

    /// Register the directional pair `asset_in -> asset_out`.
    ///
    /// Admin origin pays nothing. A signed caller offers `paid_fee` of the native
    /// currency, which must cover the current creation fee and is kept in full.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::create_pair())]
    pub fn create_pair(
      origin: OriginFor<T>,
      asset_in: AssetKind,
      asset_out: AssetKind,
      paid_fee: Balance,
    ) -> DispatchResult {
      Self::ensure_new_pair(asset_in, asset_out)?;
      let creation_fee_paid = if T::AdminOrigin::ensure_origin(origin.clone()).is_ok() {
        0
      } else {
        let who = ensure_signed(origin)?;
        ensure!(
          paid_fee >= PairCreationFee::<T>::get(),
          Error::<T>::InsufficientFee
        );
        Self::collect_creation_fee(&who, paid_fee)?;
        paid_fee
      };
      let pair_id = Self::insert_pair(asset_in, asset_out, creation_fee_paid)?;
      Self::deposit_event(Event::PairCreated {
        pair_id,
        asset_in,
        asset_out,
      });
      Ok(())
    }

    /// Set the caller's order on a pair. Zero removes the order.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::subscribe())]
    pub fn subscribe(
      origin: OriginFor<T>,
      asset_in: AssetKind,
      asset_out: AssetKind,
      amount_in: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let pair_id = Self::pair_id(asset_in, asset_out).ok_or(Error::<T>::NoPairFound)?;
      if amount_in == 0 {
        Self::remove_subscription(pair_id, &who)?;
      } else {
        Self::upsert_subscription(pair_id, &who, amount_in)?;
      }
      Self::deposit_event(Event::SubscriptionEdited {
        pair_id,
        owner: who,
        amount_in,
      });
      Ok(())
    }

    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::unsubscribe())]
    pub fn unsubscribe(
      origin: OriginFor<T>,
      asset_in: AssetKind,
      asset_out: AssetKind,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let pair_id = Self::pair_id(asset_in, asset_out).ok_or(Error::<T>::NoPairFound)?;
      if !Self::remove_subscription(pair_id, &who)? {
        return Err(Error::<T>::NoSubscriptionFound.into());
      }
      Self::deposit_event(Event::SubscriptionEdited {
        pair_id,
        owner: who,
        amount_in: 0,
      });
      Ok(())
    }

    /// Settle every covered order of a pair in one swap. Open to any signed caller.
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::trigger_pair(T::MaxSubscribersPerPair::get()))]
    pub fn trigger_pair(
      origin: OriginFor<T>,
      asset_in: AssetKind,
      asset_out: AssetKind,
    ) -> DispatchResult {
      ensure_signed(origin)?;
      let now = T::TimeProvider::now().as_secs();
      let pair = Self::do_trigger(asset_in, asset_out, now)?;
      Self::settle(pair, now)
    }

    /// `swap_fee_basis_points` above `u16::MAX` is rejected.
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::update_fees())]
    pub fn update_fees(
      origin: OriginFor<T>,
      swap_fee_basis_points: u32,
      pair_creation_fee: Balance,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let swap_fee_basis_points =
        u16::try_from(swap_fee_basis_points).map_err(|_| Error::<T>::InvalidFeeValue)?;
      SwapFeeBasisPoints::<T>::put(swap_fee_basis_points);
      PairCreationFee::<T>::put(pair_creation_fee);
      Self::deposit_event(Event::FeesUpdated {
        swap_fee_basis_points,
        pair_creation_fee,
      });
      Ok(())
    }

    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::update_collaborators())]
    pub fn update_collaborators(
      origin: OriginFor<T>,
      fee_recipient: Option<T::AccountId>,
      hub_asset: AssetKind,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      match &fee_recipient {
        Some(recipient) => FeeRecipient::<T>::put(recipient),
        None => FeeRecipient::<T>::kill(),
      }
      HubAsset::<T>::put(hub_asset);
      Self::deposit_event(Event::CollaboratorsUpdated {
        fee_recipient,
        hub_asset,
      });
      Ok(())
    }

    /// Pay the protocol's whole ledger balance of `asset` to the fee recipient.
    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::withdraw_fees())]
    pub fn withdraw_fees(origin: OriginFor<T>, asset: AssetKind) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let custody = Self::account_id();
      let amount = Deposits::<T>::get(&custody, asset);
      ensure!(amount > 0, Error::<T>::NothingToWithdraw);
      let recipient = FeeRecipient::<T>::get().ok_or(Error::<T>::NoFeeRecipient)?;
      Self::debit(&custody, asset, amount)?;
      Self::transfer_asset(asset, &custody, &recipient, amount, Preservation::Expendable)?;
      Self::deposit_event(Event::FeesWithdrawn {
        asset,
        amount,
        recipient,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Custody account holding every deposit
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    pub fn balance_of(owner: &T::AccountId, asset: AssetKind) -> Balance {
      Deposits::<T>::get(owner, asset)
    }

    /// Directional lookup, `(b, a)` is a different pair than `(a, b)`
    pub fn pair_id(asset_in: AssetKind, asset_out: AssetKind) -> Option<PairId> {
      PairIdByAssets::<T>::get(asset_in, asset_out)
    }

    pub fn subscription_amount(owner: &T::AccountId, pair_id: PairId) -> Balance {
      Subscriptions::<T>::get(pair_id, owner)
        .map(|subscription| subscription.amount_in)
        .unwrap_or_default()
    }

    /// Every pair in id order with its subscriber list
    pub fn all_pairs() -> Vec<PairSummary<T::AccountId, Balance>> {
      (1..=PairCount::<T>::get())
        .filter_map(|pair_id| {
          Pairs::<T>::get(pair_id).map(|info| PairSummary {
            info,
            subscribers: PairSubscribers::<T>::get(pair_id).into_inner(),
          })
        })
        .collect()
    }

    /// `(amount_in, owner)` for every subscriber of the pair, in list order
    pub fn pair_subscriptions(
      asset_in: AssetKind,
      asset_out: AssetKind,
    ) -> Result<Vec<(Balance, T::AccountId)>, DispatchError> {
      let pair_id = Self::pair_id(asset_in, asset_out).ok_or(Error::<T>::NoPairFound)?;
      Ok(
        PairSubscribers::<T>::get(pair_id)
          .into_iter()
          .map(|owner| (Self::subscription_amount(&owner, pair_id), owner))
          .collect(),
      )
    }

    pub fn compute_eligibility(
      asset_in: AssetKind,
      asset_out: AssetKind,
    ) -> Result<EligibleSet<T::AccountId, Balance>, DispatchError> {
      let pair_id = Self::pair_id(asset_in, asset_out).ok_or(Error::<T>::NoPairFound)?;
      Self::eligible_set(pair_id, asset_in)
    }

    /// Path handed to the exchange, routed through the hub unless one side is the hub
    pub fn swap_path(asset_in: AssetKind, asset_out: AssetKind) -> Vec<AssetKind> {
      let hub = HubAsset::<T>::get();
      if asset_in == hub || asset_out == hub {
        vec![asset_in, asset_out]
      } else {
        vec![asset_in, hub, asset_out]
      }
    }

    fn do_deposit(who: &T::AccountId, asset: AssetKind, amount: Balance) -> DispatchResult {
      ensure!(amount > 0, Error::<T>::ZeroAmount);
      Self::transfer_asset(asset, who, &Self::account_id(), amount, Preservation::Preserve)
        .map_err(|_| Error::<T>::InsufficientExternalBalance)?;
      Self::credit(who, asset, amount)?;
      Self::deposit_event(Event::Deposited {
        owner: who.clone(),
        asset,
        amount,
      });
      Ok(())
    }

    fn collect_creation_fee(who: &T::AccountId, amount: Balance) -> DispatchResult {
      if amount == 0 {
        return Ok(());
      }
      let custody = Self::account_id();
      Self::transfer_asset(AssetKind::Native, who, &custody, amount, Preservation::Preserve)
        .map_err(|_| Error::<T>::InsufficientExternalBalance)?;
      Self::credit(&custody, AssetKind::Native, amount)
    }

    fn ensure_new_pair(asset_in: AssetKind, asset_out: AssetKind) -> DispatchResult {
      // Local and Foreign ids share one pallet-assets id space
      ensure!(
        asset_in.local_id() != asset_out.local_id(),
        Error::<T>::IdenticalAssets
      );
      ensure!(
        Self::pair_id(asset_in, asset_out).is_none(),
        Error::<T>::PairExists
      );
      Ok(())
    }

    fn insert_pair(
      asset_in: AssetKind,
      asset_out: AssetKind,
      creation_fee_paid: Balance,
    ) -> Result<PairId, DispatchError> {
      let pair_id = PairCount::<T>::get()
        .checked_add(1)
        .ok_or(Error::<T>::Overflow)?;
      PairCount::<T>::put(pair_id);
      Pairs::<T>::insert(
        pair_id,
        PairInfo {
          id: pair_id,
          asset_in,
          asset_out,
          last_triggered_at: None,
          creation_fee_paid,
        },
      );
      PairIdByAssets::<T>::insert(asset_in, asset_out, pair_id);
      Ok(pair_id)
    }

    fn upsert_subscription(
      pair_id: PairId,
      who: &T::AccountId,
      amount_in: Balance,
    ) -> DispatchResult {
      if let Some(mut subscription) = Subscriptions::<T>::get(pair_id, who) {
        subscription.amount_in = amount_in;
        Subscriptions::<T>::insert(pair_id, who, subscription);
        return Ok(());
      }
      let slot = PairSubscribers::<T>::try_mutate(pair_id, |members| -> Result<u32, DispatchError> {
        let slot = members.len() as u32;
        members
          .try_push(who.clone())
          .map_err(|_| Error::<T>::TooManySubscribers)?;
        Ok(slot)
      })?;
      let deposit = T::SubscriptionDeposit::get();
      if deposit > 0 {
        Self::debit(who, AssetKind::Native, deposit)
          .map_err(|_| Error::<T>::InsufficientSubscriptionDeposit)?;
      }
      Subscriptions::<T>::insert(
        pair_id,
        who,
        SubscriptionInfo {
          amount_in,
          slot,
          deposit,
        },
      );
      Ok(())
    }

    /// Swap-remove `who` from the pair and return the bond. Returns whether a
    /// subscription existed.
    fn remove_subscription(pair_id: PairId, who: &T::AccountId) -> Result<bool, DispatchError> {
      let Some(removed) = Subscriptions::<T>::take(pair_id, who) else {
        return Ok(false);
      };
      if removed.deposit > 0 {
        Self::credit(who, AssetKind::Native, removed.deposit)?;
      }
      PairSubscribers::<T>::mutate(pair_id, |members| {
        let slot = removed.slot as usize;
        if slot >= members.len() {
          return;
        }
        members.swap_remove(slot);
        if let Some(moved) = members.get(slot) {
          Subscriptions::<T>::mutate(pair_id, moved, |entry| {
            if let Some(subscription) = entry {
              subscription.slot = removed.slot;
            }
          });
        }
      });
      Ok(true)
    }

    /// Throttle gate. Stamps the pair with `now` when it may settle again.
    pub(crate) fn do_trigger(
      asset_in: AssetKind,
      asset_out: AssetKind,
      now: u64,
    ) -> Result<PairInfo<Balance>, DispatchError> {
      let pair_id = Self::pair_id(asset_in, asset_out).ok_or(Error::<T>::NoPairFound)?;
      Pairs::<T>::try_mutate(pair_id, |maybe_pair| -> Result<PairInfo<Balance>, DispatchError> {
        let pair = maybe_pair.as_mut().ok_or(Error::<T>::NoPairFound)?;
        if let Some(last) = pair.last_triggered_at {
          let next_allowed = last.saturating_add(T::TriggerFrequency::get());
          if now < next_allowed {
            log::debug!(
              target: LOG_TARGET,
              "pair {} throttled until {}, now {}",
              pair_id,
              next_allowed,
              now
            );
            return Err(Error::<T>::TooSoon.into());
          }
        }
        pair.last_triggered_at = Some(now);
        Ok(*pair)
      })
    }

    fn eligible_set(
      pair_id: PairId,
      asset_in: AssetKind,
    ) -> Result<EligibleSet<T::AccountId, Balance>, DispatchError> {
      let members = PairSubscribers::<T>::get(pair_id);
      let mut set = EligibleSet {
        slots: Vec::with_capacity(members.len()),
        total_amount_in: 0 as Balance,
        eligible_count: 0,
      };
      for owner in members {
        let amount_in = Self::subscription_amount(&owner, pair_id);
        if amount_in > 0 && Deposits::<T>::get(&owner, asset_in) >= amount_in {
          set.total_amount_in = set
            .total_amount_in
            .checked_add(amount_in)
            .ok_or(Error::<T>::Overflow)?;
          set.eligible_count += 1;
          set.slots.push(Some((owner, amount_in)));
        } else {
          set.slots.push(None);
        }
      }
      Ok(set)
    }

    /// Debit, swap once, pay the fee and distribute the rest.
    fn settle(pair: PairInfo<Balance>, now: u64) -> DispatchResult {
      let eligible = Self::eligible_set(pair.id, pair.asset_in)?;
      log::debug!(
        target: LOG_TARGET,
        "pair {}: {} of {} subscribers eligible, total in {}",
        pair.id,
        eligible.eligible_count,
        eligible.slots.len(),
        eligible.total_amount_in
      );
      ensure!(
        eligible.eligible_count > 0,
        Error::<T>::NoEligibleSubscriptions
      );

      let mut amounts = Vec::with_capacity(eligible.eligible_count as usize);
      for (owner, amount_in) in eligible.orders() {
        Self::debit(owner, pair.asset_in, amount_in)?;
        amounts.push(amount_in);
      }

      let custody = Self::account_id();
      let total_amount_out = T::SwapExecutor::swap_exact_tokens_for_tokens(
        custody.clone(),
        Self::swap_path(pair.asset_in, pair.asset_out),
        eligible.total_amount_in,
        1,
        custody.clone(),
        false,
      )
      .map_err(|e| {
        log::warn!(target: LOG_TARGET, "pair {} swap failed: {:?}", pair.id, e);
        Error::<T>::SwapFailed
      })?;

      let fee = distribution::protocol_fee(total_amount_out, SwapFeeBasisPoints::<T>::get())?;
      let pool = distribution::distributable_pool(total_amount_out, fee)
        .ok_or(Error::<T>::FeeExceedsOutput)?;
      let split = distribution::split_pro_rata(pool, &amounts, eligible.total_amount_in)?;

      for ((owner, _), owed) in eligible.orders().zip(split.shares.iter()) {
        Self::credit(owner, pair.asset_out, *owed)?;
      }
      Self::pay_swap_fee(pair.asset_out, fee)?;
      let retained = fee.checked_add(split.dust).ok_or(Error::<T>::Overflow)?;
      if retained > 0 {
        Self::credit(&custody, pair.asset_out, retained)?;
      }

      log::info!(
        target: LOG_TARGET,
        "pair {} settled: in {}, out {}, fee {}, dust {}",
        pair.id,
        eligible.total_amount_in,
        total_amount_out,
        fee,
        split.dust
      );
      Self::deposit_event(Event::Settled {
        pair_id: pair.id,
        last_triggered_at: now,
        total_amount_in: eligible.total_amount_in,
        total_amount_out,
        fee,
        participants: eligible.eligible_count,
      });
      Ok(())
    }

    /// Direct fee payout, kept on the protocol's ledger entry while no recipient is set.
    ///
    /// A payout the recipient's account cannot receive (below the asset's minimum
    /// balance) is credited to the recipient's ledger entry instead.
    fn pay_swap_fee(asset: AssetKind, fee: Balance) -> DispatchResult {
      if fee == 0 {
        return Ok(());
      }
      let custody = Self::account_id();
      let Some(recipient) = FeeRecipient::<T>::get() else {
        return Self::credit(&custody, asset, fee);
      };
      let paid = with_storage_layer(|| {
        Self::transfer_asset(asset, &custody, &recipient, fee, Preservation::Expendable)
      });
      if let Err(error) = paid {
        log::debug!(
          target: LOG_TARGET,
          "fee of {} {:?} kept on the recipient's ledger: {:?}",
          fee,
          asset,
          error
        );
        Self::credit(&recipient, asset, fee)?;
      }
      Ok(())
    }

    fn credit(who: &T::AccountId, asset: AssetKind, amount: Balance) -> DispatchResult {
      Deposits::<T>::try_mutate(who, asset, |balance| -> DispatchResult {
        *balance = balance.checked_add(amount).ok_or(Error::<T>::Overflow)?;
        Ok(())
      })
    }

    fn debit(who: &T::AccountId, asset: AssetKind, amount: Balance) -> DispatchResult {
      Deposits::<T>::try_mutate(who, asset, |balance| -> DispatchResult {
        *balance = balance
          .checked_sub(amount)
          .ok_or(Error::<T>::InsufficientBalance)?;
        Ok(())
      })
    }

    fn transfer_asset(
      asset: AssetKind,
      from: &T::AccountId,
      to: &T::AccountId,
      amount: Balance,
      preservation: Preservation,
    ) -> DispatchResult {
      match asset.local_id() {
        None => {
          <T::Currency as NativeMutate<T::AccountId>>::transfer(from, to, amount, preservation)?;
        }
        Some(id) => {
          <T::Assets as FungiblesMutate<T::AccountId>>::transfer(
            id,
            from,
            to,
            amount,
            preservation,
          )?;
        }
      }
      Ok(())
    }
  }
}
