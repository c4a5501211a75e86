#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn deposit() -> Weight;
	fn deposit_native() -> Weight;
	fn withdraw() -> Weight;
	fn create_pair() -> Weight;
	fn subscribe() -> Weight;
	fn unsubscribe() -> Weight;
	fn trigger_pair(s: u32) -> Weight;
	fn update_fees() -> Weight;
	fn update_collaborators() -> Weight;
	fn withdraw_fees() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn deposit() -> Weight {
		Weight::from_parts(45_000_000, 3600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	fn deposit_native() -> Weight {
		Weight::from_parts(40_000_000, 3600)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	fn withdraw() -> Weight {
		Weight::from_parts(45_000_000, 3600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	fn create_pair() -> Weight {
		Weight::from_parts(40_000_000, 3500)
			.saturating_add(T::DbWeight::get().reads(5))
			.saturating_add(T::DbWeight::get().writes(6))
	}
	fn subscribe() -> Weight {
		Weight::from_parts(32_000_000, 3100)
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	fn unsubscribe() -> Weight {
		Weight::from_parts(32_000_000, 3100)
			.saturating_add(T::DbWeight::get().reads(5))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	/// The range of component `s` is `[1, MaxSubscribersPerPair]`.
	fn trigger_pair(s: u32) -> Weight {
		Weight::from_parts(90_000_000, 6000)
			.saturating_add(Weight::from_parts(12_000_000, 2600).saturating_mul(s.into()))
			.saturating_add(T::DbWeight::get().reads(8))
			.saturating_add(T::DbWeight::get().reads((2_u64).saturating_mul(s.into())))
			.saturating_add(T::DbWeight::get().writes(6))
			.saturating_add(T::DbWeight::get().writes((2_u64).saturating_mul(s.into())))
	}
	fn update_fees() -> Weight {
		Weight::from_parts(12_000_000, 0)
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn update_collaborators() -> Weight {
		Weight::from_parts(12_000_000, 0)
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn withdraw_fees() -> Weight {
		Weight::from_parts(45_000_000, 3600)
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().writes(3))
	}
}

impl WeightInfo for () {
	fn deposit() -> Weight {
		Weight::from_parts(45_000_000, 3600)
	}
	fn deposit_native() -> Weight {
		Weight::from_parts(40_000_000, 3600)
	}
	fn withdraw() -> Weight {
		Weight::from_parts(45_000_000, 3600)
	}
	fn create_pair() -> Weight {
		Weight::from_parts(40_000_000, 3500)
	}
	fn subscribe() -> Weight {
		Weight::from_parts(32_000_000, 3100)
	}
	fn unsubscribe() -> Weight {
		Weight::from_parts(32_000_000, 3100)
	}
	fn trigger_pair(s: u32) -> Weight {
		Weight::from_parts(90_000_000, 6000)
			.saturating_add(Weight::from_parts(12_000_000, 2600).saturating_mul(s.into()))
			.saturating_add(RocksDbWeight::get().reads(8))
			.saturating_add(RocksDbWeight::get().writes(6))
	}
	fn update_fees() -> Weight {
		Weight::from_parts(12_000_000, 0)
	}
	fn update_collaborators() -> Weight {
		Weight::from_parts(12_000_000, 0)
	}
	fn withdraw_fees() -> Weight {
		Weight::from_parts(45_000_000, 3600)
	}
}
