extern crate alloc;

use crate as pallet_recurring_orders;
use alloc::vec::Vec;
use polkadot_sdk::frame_support::traits::tokens::{Fortitude, Precision, Preservation};
use polkadot_sdk::frame_support::traits::{fungible, fungibles};
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU16, ConstU32, ConstU64, ConstU128, Get},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AssetKind,
  ecosystem::{pallet_ids, params},
};
use std::cell::RefCell;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
pub const TREASURY: u64 = 999;
pub const ASSET_OWNER: u64 = 100;

pub const ASSET_A: u32 = 1;
pub const ASSET_B: u32 = 2;
pub const ASSET_C: u32 = 3;
/// Asset whose accounts need at least `ASSET_D_MIN_BALANCE`
pub const ASSET_D: u32 = 4;
pub const ASSET_D_MIN_BALANCE: u128 = 1_000;

pub const INITIAL_BALANCE: u128 = 1_000_000_000_000_000;

/// Clock at the start of every test, in seconds
pub const GENESIS_TIME: u64 = 1_700_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapCall {
  pub who: u64,
  pub path: Vec<AssetKind>,
  pub amount_in: u128,
  pub min_amount_out: u128,
  pub recipient: u64,
}

// State containers for stateful mocks
thread_local! {
    // Fixed output of the next swaps, 1:1 when unset
    pub static SWAP_OUTPUT: RefCell<Option<u128>> = const { RefCell::new(None) };
    pub static SWAP_FAILS: RefCell<bool> = const { RefCell::new(false) };
    pub static SWAP_CALLS: RefCell<Vec<SwapCall>> = const { RefCell::new(Vec::new()) };
}

pub fn set_swap_output(amount_out: u128) {
  SWAP_OUTPUT.with(|o| *o.borrow_mut() = Some(amount_out));
}

pub fn set_swap_fails(fails: bool) {
  SWAP_FAILS.with(|f| *f.borrow_mut() = fails);
}

pub fn swap_calls() -> Vec<SwapCall> {
  SWAP_CALLS.with(|c| c.borrow().clone())
}

/// Move the clock to `secs` unix seconds
pub fn set_now(secs: u64) {
  Timestamp::set_timestamp(secs * 1_000);
}

fn burn(asset: AssetKind, who: &u64, amount: u128) -> Result<u128, DispatchError> {
  match asset {
    AssetKind::Native => <Balances as fungible::Mutate<u64>>::burn_from(
      who,
      amount,
      Preservation::Expendable,
      Precision::Exact,
      Fortitude::Polite,
    ),
    AssetKind::Local(id) | AssetKind::Foreign(id) => <Assets as fungibles::Mutate<u64>>::burn_from(
      id,
      who,
      amount,
      Preservation::Expendable,
      Precision::Exact,
      Fortitude::Polite,
    ),
  }
}

fn mint(asset: AssetKind, who: &u64, amount: u128) -> Result<u128, DispatchError> {
  match asset {
    AssetKind::Native => <Balances as fungible::Mutate<u64>>::mint_into(who, amount),
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <Assets as fungibles::Mutate<u64>>::mint_into(id, who, amount)
    }
  }
}

/// Exchange that burns the input and mints the programmed output
pub struct MockSwap;
impl pallet_recurring_orders::SwapExecutor<u64, u128> for MockSwap {
  fn swap_exact_tokens_for_tokens(
    who: u64,
    path: Vec<AssetKind>,
    amount_in: u128,
    min_amount_out: u128,
    recipient: u64,
    _keep_alive: bool,
  ) -> Result<u128, DispatchError> {
    SWAP_CALLS.with(|c| {
      c.borrow_mut().push(SwapCall {
        who,
        path: path.clone(),
        amount_in,
        min_amount_out,
        recipient,
      })
    });
    if SWAP_FAILS.with(|f| *f.borrow()) {
      return Err(DispatchError::Other("Mock swap failed"));
    }
    let (Some(asset_in), Some(asset_out)) = (path.first(), path.last()) else {
      return Err(DispatchError::Other("Empty path"));
    };
    let amount_out = SWAP_OUTPUT.with(|o| *o.borrow()).unwrap_or(amount_in);
    if amount_out < min_amount_out {
      return Err(DispatchError::Other("Insufficient output amount"));
    }
    burn(*asset_in, &who, amount_in)?;
    mint(*asset_out, &recipient, amount_out)?;
    Ok(amount_out)
  }
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Timestamp: polkadot_sdk::pallet_timestamp,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    RecurringOrders: pallet_recurring_orders,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_timestamp::Config for Test {
  type Moment = u64;
  type OnTimestampSet = ();
  type MinimumPeriod = ConstU64<1>;
  type WeightInfo = ();
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

parameter_types! {
  // Membership bond, off unless a test sets it
  pub storage SubscriptionBond: u128 = 0;
}

pub struct PalletIdStub;
impl Get<PalletId> for PalletIdStub {
  fn get() -> PalletId {
    PalletId(*pallet_ids::RECURRING_ORDERS_PALLET_ID)
  }
}

impl pallet_recurring_orders::Config for Test {
  type Assets = Assets;
  type Currency = Balances;
  type SwapExecutor = MockSwap;
  type TimeProvider = Timestamp;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type PalletId = PalletIdStub;
  type TriggerFrequency = ConstU64<{ params::TRIGGER_FREQUENCY_SECS }>;
  type MaxSubscribersPerPair = ConstU32<4>;
  type DefaultSwapFeeBasisPoints = ConstU16<{ params::DEFAULT_SWAP_FEE_BASIS_POINTS }>;
  type DefaultPairCreationFee = ConstU128<{ params::DEFAULT_PAIR_CREATION_FEE }>;
  type SubscriptionDeposit = SubscriptionBond;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = RecurringOrdersBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct RecurringOrdersBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64, u128> for RecurringOrdersBenchmarkHelper {
  fn trading_pair() -> (AssetKind, AssetKind) {
    (AssetKind::Native, AssetKind::Local(ASSET_A))
  }

  fn ensure_funded(
    who: &u64,
    asset: AssetKind,
    amount: u128,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    mint(asset, who, amount).map(|_| ())
  }

  fn prepare_exchange(
    _asset_in: AssetKind,
    _asset_out: AssetKind,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    Ok(())
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![
      (ALICE, INITIAL_BALANCE),
      (BOB, INITIAL_BALANCE),
      (CHARLIE, INITIAL_BALANCE),
      (ASSET_OWNER, INITIAL_BALANCE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Sufficient assets, min balance 1 except ASSET_D
  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![
      (ASSET_A, ASSET_OWNER, true, 1),
      (ASSET_B, ASSET_OWNER, true, 1),
      (ASSET_C, ASSET_OWNER, true, 1),
      (ASSET_D, ASSET_OWNER, true, ASSET_D_MIN_BALANCE),
    ],
    metadata: alloc::vec![],
    accounts: alloc::vec![
      (ASSET_A, ALICE, INITIAL_BALANCE),
      (ASSET_A, BOB, INITIAL_BALANCE),
      (ASSET_A, CHARLIE, INITIAL_BALANCE),
      (ASSET_B, ALICE, INITIAL_BALANCE),
      (ASSET_B, BOB, INITIAL_BALANCE),
    ],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_recurring_orders::GenesisConfig::<Test> {
    fee_recipient: Some(TREASURY),
    hub_asset: AssetKind::Native,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Reset State
  SWAP_OUTPUT.with(|o| *o.borrow_mut() = None);
  SWAP_FAILS.with(|f| *f.borrow_mut() = false);
  SWAP_CALLS.with(|c| c.borrow_mut().clear());

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| {
    System::set_block_number(1);
    set_now(GENESIS_TIME);
  });
  ext
}
