//! VLAN ID stack arithmetic
//!
//! A list of 12-bit VLAN IDs (for example an 802.1ad S-tag/C-tag pair) is
//! treated as one base-4096 number, outermost tag first. Increasing the
//! list adds the step to that number and carries between tags:
//!
//! ```
//! use addrkit_vlan::increase_vlan_ids;
//!
//! assert_eq!(increase_vlan_ids(&[100, 4095], 2).unwrap(), vec![101, 1]);
//! assert_eq!(increase_vlan_ids(&[4095, 4095], 2).unwrap(), vec![1, 0, 1]);
//! ```
//!
//! A carry past the outermost tag adds a new leading tag. Use
//! [`VlanIncrement`] with `max_len` to reject that instead.

use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest valid VLAN ID
pub const MAX_VLAN_ID: u16 = 0xFFF;

const VLAN_ID_BITS: usize = 12;

/// VLAN arithmetic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VlanError {
    /// Input ID does not fit in 12 bits
    #[error("Invalid VLAN ID: {0} (must be 0-4095)")]
    InvalidVlanId(u16),

    /// Step takes the stack below zero
    #[error("Step {step} results in a negative VLAN stack")]
    Underflow { step: BigInt },

    /// Carry grew the stack past the configured limit
    #[error("Result needs {len} VLAN IDs, limit is {max}")]
    TooManyIds { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, VlanError>;

/// Options for VLAN stack increments
///
/// The default places no limit on the number of IDs in the result.
///
/// ```
/// use addrkit_vlan::{VlanError, VlanIncrement};
///
/// let qinq = VlanIncrement { max_len: Some(2) };
/// assert_eq!(qinq.apply(&[100, 4095], 2).unwrap(), vec![101, 1]);
/// assert!(matches!(
///     qinq.apply(&[4095, 4095], 2),
///     Err(VlanError::TooManyIds { len: 3, max: 2 })
/// ));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlanIncrement {
    /// Maximum number of IDs the result may hold
    pub max_len: Option<usize>,
}

impl VlanIncrement {
    /// Add `step` (may be negative) to the stack `ids`
    ///
    /// The result never has fewer IDs than the input. An empty input is
    /// returned as is.
    pub fn apply(&self, ids: &[u16], step: impl Into<BigInt>) -> Result<Vec<u16>> {
        if let Some(&bad) = ids.iter().find(|&&id| id > MAX_VLAN_ID) {
            tracing::debug!(id = bad, "invalid VLAN ID");
            return Err(VlanError::InvalidVlanId(bad));
        }

        let step = step.into();
        if ids.is_empty() || step.is_zero() {
            return Ok(ids.to_vec());
        }

        let value = ids.iter().fold(BigUint::zero(), |acc, &id| {
            (acc << VLAN_ID_BITS) | BigUint::from(id)
        });

        let Some(mut sum) = (BigInt::from(value) + &step).to_biguint() else {
            tracing::debug!(?ids, %step, "VLAN stack underflows");
            return Err(VlanError::Underflow { step });
        };

        let mask = BigUint::from(MAX_VLAN_ID);
        let mut out = Vec::with_capacity(ids.len() + 1);
        while out.len() < ids.len() || !sum.is_zero() {
            // masked to 12 bits, always fits
            out.push((&sum & &mask).to_u16().unwrap_or(0));
            sum >>= VLAN_ID_BITS;
        }
        out.reverse();

        if let Some(max) = self.max_len {
            if out.len() > max {
                tracing::debug!(?ids, %step, max, "VLAN stack grew past limit");
                return Err(VlanError::TooManyIds { len: out.len(), max });
            }
        }

        Ok(out)
    }
}

/// Add `step` to a VLAN ID stack with no limit on its length
pub fn increase_vlan_ids(ids: &[u16], step: impl Into<BigInt>) -> Result<Vec<u16>> {
    VlanIncrement::default().apply(ids, step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_without_carry() {
        assert_eq!(increase_vlan_ids(&[100, 200], 2).unwrap(), vec![100, 202]);
        assert_eq!(increase_vlan_ids(&[7], 5).unwrap(), vec![12]);
    }

    #[test]
    fn test_increase_with_carry() {
        assert_eq!(increase_vlan_ids(&[100, 4095], 2).unwrap(), vec![101, 1]);
        assert_eq!(increase_vlan_ids(&[0, 4095, 4095], 1).unwrap(), vec![1, 0, 0]);
    }

    #[test]
    fn test_decrease_with_borrow() {
        assert_eq!(increase_vlan_ids(&[100, 4095], -2).unwrap(), vec![100, 4093]);
        assert_eq!(increase_vlan_ids(&[101, 1], -2).unwrap(), vec![100, 4095]);
    }

    #[test]
    fn test_carry_grows_stack() {
        assert_eq!(increase_vlan_ids(&[4095, 4095], 2).unwrap(), vec![1, 0, 1]);
        assert_eq!(increase_vlan_ids(&[4095], 1).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_zero_step_is_identity() {
        assert_eq!(increase_vlan_ids(&[4095, 4093], 0).unwrap(), vec![4095, 4093]);
        assert_eq!(increase_vlan_ids(&[400, 4095], 0).unwrap(), vec![400, 4095]);
        assert_eq!(increase_vlan_ids(&[0, 0], 0).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_leading_zero_ids_kept() {
        assert_eq!(increase_vlan_ids(&[0, 5], 1).unwrap(), vec![0, 6]);
        assert_eq!(increase_vlan_ids(&[0, 1], -1).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_empty_stack() {
        assert_eq!(increase_vlan_ids(&[], 5).unwrap(), Vec::<u16>::new());
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(
            increase_vlan_ids(&[8000, 4095], 2),
            Err(VlanError::InvalidVlanId(8000))
        );
        assert_eq!(
            increase_vlan_ids(&[400, 9000], 2),
            Err(VlanError::InvalidVlanId(9000))
        );
        assert_eq!(
            increase_vlan_ids(&[4096], 0),
            Err(VlanError::InvalidVlanId(4096))
        );
    }

    #[test]
    fn test_underflow() {
        assert!(matches!(
            increase_vlan_ids(&[0, 1], -2),
            Err(VlanError::Underflow { .. })
        ));
    }

    #[test]
    fn test_big_step() {
        // 4096^3 + 2
        let step = BigInt::from(1u64 << 36) + 2;
        assert_eq!(increase_vlan_ids(&[0, 0], step).unwrap(), vec![1, 0, 0, 2]);
    }

    #[test]
    fn test_max_len() {
        let qinq = VlanIncrement { max_len: Some(2) };
        assert_eq!(qinq.apply(&[4095, 4094], 1).unwrap(), vec![4095, 4095]);
        assert_eq!(
            qinq.apply(&[4095, 4095], 2),
            Err(VlanError::TooManyIds { len: 3, max: 2 })
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            VlanError::InvalidVlanId(5000).to_string(),
            "Invalid VLAN ID: 5000 (must be 0-4095)"
        );
    }

    #[test]
    fn test_options_deserialization() {
        let opts: VlanIncrement = serde_json::from_str("{}").expect("deserialization failed");
        assert_eq!(opts, VlanIncrement::default());

        let opts: VlanIncrement =
            serde_json::from_str(r#"{"max_len":2}"#).expect("deserialization failed");
        assert_eq!(opts.max_len, Some(2));
    }
}
