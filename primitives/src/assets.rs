use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Asset identity shared by every ledger, pair and exchange path in the workspace.
///
/// - `Native`: the system's native token (managed by pallet-balances).
/// - `Local(u32)`: assets issued on this chain (managed by pallet-assets).
/// - `Foreign(u32)`: assets bridged in over XCM (also held in pallet-assets).
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native token managed by pallet-balances
  #[default]
  Native,
  /// Local asset managed by pallet-assets
  Local(u32),
  /// Foreign asset managed by pallet-assets
  Foreign(u32),
}

/// Helper trait to inspect AssetKind properties
pub trait AssetInspector {
  /// Id inside pallet-assets, `None` for the native token
  fn local_id(&self) -> Option<u32>;
}

impl AssetInspector for AssetKind {
  fn local_id(&self) -> Option<u32> {
    match self {
      AssetKind::Local(id) | AssetKind::Foreign(id) => Some(*id),
      AssetKind::Native => None,
    }
  }
}
