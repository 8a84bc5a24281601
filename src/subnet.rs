//! Maps an index onto a /24 inside 10.0.0.0/8.

use thiserror::Error;

/// Largest index that still has a /24 of its own under 10.0.0.0/8.
pub const MAX_SUBNET_INDEX: i64 = 0xFFFF;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubnetError {
    #[error("subnet index {0} is outside 0..=65535")]
    OutOfRange(i64),
}

/// Returns `10.<high>.<low>.0/24` for the two bytes of `index`.
///
/// Distinct indexes in range never share a subnet.
pub fn integer_to_subnet(index: i64) -> Result<String, SubnetError> {
    if !(0..=MAX_SUBNET_INDEX).contains(&index) {
        return Err(SubnetError::OutOfRange(index));
    }

    let high = (index >> 8) & 0xFF;
    let low = index & 0xFF;
    Ok(format!("10.{}.{}.0/24", high, low))
}
