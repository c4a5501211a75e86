use crate::*;
use frame::deps::frame_benchmarking::{account, v2::*};
use frame::deps::frame_support::traits::{EnsureOrigin, Get};
use frame::deps::frame_system::RawOrigin;
use primitives::{AssetKind, Balance};

const ORDER: Balance = 1_000_000_000;

fn fund_bond<T: Config>(who: &T::AccountId) {
  let bond = T::SubscriptionDeposit::get();
  if bond == 0 {
    return;
  }
  T::BenchmarkHelper::ensure_funded(who, AssetKind::Native, bond.saturating_mul(2))
    .expect("Failed to fund bond");
  Pallet::<T>::deposit_native(RawOrigin::Signed(who.clone()).into(), bond)
    .expect("Failed to deposit bond");
}

fn funded_subscriber<T: Config>(
  index: u32,
  asset_in: AssetKind,
  asset_out: AssetKind,
) -> T::AccountId {
  let who: T::AccountId = account("subscriber", index, 0);
  T::BenchmarkHelper::ensure_funded(&who, asset_in, ORDER * 10).expect("Failed to fund subscriber");
  Pallet::<T>::deposit(RawOrigin::Signed(who.clone()).into(), asset_in, ORDER * 2)
    .expect("Failed to deposit");
  fund_bond::<T>(&who);
  Pallet::<T>::subscribe(RawOrigin::Signed(who.clone()).into(), asset_in, asset_out, ORDER)
    .expect("Failed to subscribe");
  who
}

fn admin_pair<T: Config>(asset_in: AssetKind, asset_out: AssetKind) {
  let origin =
    T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
  Pallet::<T>::create_pair(origin, asset_in, asset_out, 0).expect("Failed to create pair");
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn deposit() {
    let caller: T::AccountId = whitelisted_caller();
    let (asset_in, _) = T::BenchmarkHelper::trading_pair();
    T::BenchmarkHelper::ensure_funded(&caller, asset_in, ORDER * 10)
      .expect("Failed to fund caller");

    #[extrinsic_call]
    deposit(RawOrigin::Signed(caller.clone()), asset_in, ORDER);

    assert_eq!(Pallet::<T>::balance_of(&caller, asset_in), ORDER);
  }

  #[benchmark]
  fn deposit_native() {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, AssetKind::Native, ORDER * 10)
      .expect("Failed to fund caller");

    #[extrinsic_call]
    deposit_native(RawOrigin::Signed(caller.clone()), ORDER);

    assert_eq!(Pallet::<T>::balance_of(&caller, AssetKind::Native), ORDER);
  }

  #[benchmark]
  fn withdraw() {
    let caller: T::AccountId = whitelisted_caller();
    let (asset_in, _) = T::BenchmarkHelper::trading_pair();
    T::BenchmarkHelper::ensure_funded(&caller, asset_in, ORDER * 10)
      .expect("Failed to fund caller");
    Pallet::<T>::deposit(RawOrigin::Signed(caller.clone()).into(), asset_in, ORDER)
      .expect("Failed to deposit");

    #[extrinsic_call]
    withdraw(RawOrigin::Signed(caller.clone()), asset_in, ORDER);

    assert_eq!(Pallet::<T>::balance_of(&caller, asset_in), 0);
  }

  #[benchmark]
  fn create_pair() {
    let caller: T::AccountId = whitelisted_caller();
    let (asset_in, asset_out) = T::BenchmarkHelper::trading_pair();
    let fee = PairCreationFee::<T>::get();
    T::BenchmarkHelper::ensure_funded(
      &caller,
      AssetKind::Native,
      fee.saturating_mul(2).saturating_add(ORDER),
    )
    .expect("Failed to fund caller");

    #[extrinsic_call]
    create_pair(RawOrigin::Signed(caller), asset_in, asset_out, fee);

    assert!(Pallet::<T>::pair_id(asset_in, asset_out).is_some());
  }

  #[benchmark]
  fn subscribe() {
    let caller: T::AccountId = whitelisted_caller();
    let (asset_in, asset_out) = T::BenchmarkHelper::trading_pair();
    admin_pair::<T>(asset_in, asset_out);
    fund_bond::<T>(&caller);

    #[extrinsic_call]
    subscribe(RawOrigin::Signed(caller.clone()), asset_in, asset_out, ORDER);

    assert_eq!(Pallet::<T>::subscription_amount(&caller, 1), ORDER);
  }

  #[benchmark]
  fn unsubscribe() {
    let (asset_in, asset_out) = T::BenchmarkHelper::trading_pair();
    admin_pair::<T>(asset_in, asset_out);
    // worst case moves the last member into the freed slot
    let first = funded_subscriber::<T>(0, asset_in, asset_out);
    funded_subscriber::<T>(1, asset_in, asset_out);

    #[extrinsic_call]
    unsubscribe(RawOrigin::Signed(first.clone()), asset_in, asset_out);

    assert_eq!(Pallet::<T>::subscription_amount(&first, 1), 0);
  }

  #[benchmark]
  fn trigger_pair(s: Linear<1, { T::MaxSubscribersPerPair::get() }>) {
    let caller: T::AccountId = whitelisted_caller();
    let (asset_in, asset_out) = T::BenchmarkHelper::trading_pair();
    admin_pair::<T>(asset_in, asset_out);
    T::BenchmarkHelper::prepare_exchange(asset_in, asset_out).expect("Failed to prepare exchange");
    for index in 0..s {
      funded_subscriber::<T>(index, asset_in, asset_out);
    }

    #[extrinsic_call]
    trigger_pair(RawOrigin::Signed(caller), asset_in, asset_out);

    assert!(Pallet::<T>::pairs(1).and_then(|pair| pair.last_triggered_at).is_some());
  }

  #[benchmark]
  fn update_fees() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    update_fees(origin, 50, ORDER);

    assert_eq!(SwapFeeBasisPoints::<T>::get(), 50);
  }

  #[benchmark]
  fn update_collaborators() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let recipient: T::AccountId = account("recipient", 0, 0);
    let (_, hub) = T::BenchmarkHelper::trading_pair();

    #[extrinsic_call]
    update_collaborators(origin, Some(recipient), hub);

    assert_eq!(HubAsset::<T>::get(), hub);
  }

  #[benchmark]
  fn withdraw_fees() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let recipient: T::AccountId = account("recipient", 0, 0);
    let caller: T::AccountId = whitelisted_caller();
    let (asset_in, asset_out) = T::BenchmarkHelper::trading_pair();
    let fee = PairCreationFee::<T>::get().max(ORDER);
    T::BenchmarkHelper::ensure_funded(&caller, AssetKind::Native, fee.saturating_mul(2))
      .expect("Failed to fund caller");
    T::BenchmarkHelper::ensure_funded(&recipient, AssetKind::Native, ORDER)
      .expect("Failed to fund recipient");
    FeeRecipient::<T>::put(recipient);
    Pallet::<T>::create_pair(RawOrigin::Signed(caller).into(), asset_in, asset_out, fee)
      .expect("Failed to create pair");

    #[extrinsic_call]
    withdraw_fees(origin, AssetKind::Native);

    assert_eq!(
      Pallet::<T>::balance_of(&Pallet::<T>::account_id(), AssetKind::Native),
      0
    );
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}

