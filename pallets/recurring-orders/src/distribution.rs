//! Integer math of a settlement.
//!
//! Every quantity is floored. Products are formed in 256 bits and narrowed back
//! to [`Balance`] only when the result fits.

use polkadot_sdk::sp_core::U256;
use polkadot_sdk::sp_runtime::ArithmeticError;
use primitives::{
  Balance,
  ecosystem::params::{BASIS_POINTS_DENOMINATOR, PRECISION},
};
use scale_info::prelude::vec::Vec;

/// Output of [`split_pro_rata`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProRataSplit {
  /// One share per order, same order as the input
  pub shares: Vec<Balance>,
  /// Part of the pool left over by rounding
  pub dust: Balance,
}

fn narrow(value: U256) -> Result<Balance, ArithmeticError> {
  if value > U256::from(Balance::MAX) {
    return Err(ArithmeticError::Overflow);
  }
  Ok(value.as_u128())
}

/// `floor(amount_out * fee_basis_points / 10_000)`
pub fn protocol_fee(amount_out: Balance, fee_basis_points: u16) -> Result<Balance, ArithmeticError> {
  let fee = U256::from(amount_out)
    .checked_mul(U256::from(fee_basis_points))
    .ok_or(ArithmeticError::Overflow)?
    / U256::from(BASIS_POINTS_DENOMINATOR);
  narrow(fee)
}

/// What is left for subscribers once the fee has been taken twice.
///
/// `None` when twice the fee exceeds the output.
pub fn distributable_pool(amount_out: Balance, fee: Balance) -> Option<Balance> {
  fee
    .checked_mul(2)
    .and_then(|double_fee| amount_out.checked_sub(double_fee))
}

/// `floor(amount_in * PRECISION / total_amount_in)`
pub fn weight(amount_in: Balance, total_amount_in: Balance) -> Result<Balance, ArithmeticError> {
  if total_amount_in == 0 {
    return Err(ArithmeticError::DivisionByZero);
  }
  let scaled = U256::from(amount_in)
    .checked_mul(U256::from(PRECISION))
    .ok_or(ArithmeticError::Overflow)?;
  narrow(scaled / U256::from(total_amount_in))
}

/// `floor(pool * weight / PRECISION)`
pub fn share(pool: Balance, weight: Balance) -> Result<Balance, ArithmeticError> {
  let scaled = U256::from(pool)
    .checked_mul(U256::from(weight))
    .ok_or(ArithmeticError::Overflow)?;
  narrow(scaled / U256::from(PRECISION))
}

/// Split `pool` across `amounts` in proportion to each order.
///
/// `total_amount_in` must be the sum of `amounts`. The shares never add up to
/// more than the pool.
pub fn split_pro_rata(
  pool: Balance,
  amounts: &[Balance],
  total_amount_in: Balance,
) -> Result<ProRataSplit, ArithmeticError> {
  let mut shares = Vec::with_capacity(amounts.len());
  let mut distributed: Balance = 0;
  for amount_in in amounts {
    let owed = share(pool, weight(*amount_in, total_amount_in)?)?;
    distributed = distributed
      .checked_add(owed)
      .ok_or(ArithmeticError::Overflow)?;
    shares.push(owed);
  }
  let dust = pool
    .checked_sub(distributed)
    .ok_or(ArithmeticError::Underflow)?;
  Ok(ProRataSplit { shares, dust })
}
