//! Core types and big-integer arithmetic for addrkit
//!
//! This crate provides the foundational pieces used throughout the addrkit workspace:
//! - [`AddrFamily`] - Explicit IPv4/IPv6 tag
//! - [`MacAddr`] - MAC-48 hardware address
//! - Address <-> integer conversion ([`ip_to_int`], [`int_to_ip`], [`int_to_bytes`], ...)
//! - Bounds-checked increment ([`increment_ip`], [`increment_mac`])
//! - [`AddrError`] - Error types
//!
//! All arithmetic goes through arbitrary-precision integers, so adding a step
//! never wraps; results outside the address width are reported as errors.
//!
//! ```
//! use addrkit_core::{increment_ip, increment_mac, MacAddr};
//! use std::net::IpAddr;
//!
//! let ip: IpAddr = "192.168.10.255".parse().unwrap();
//! assert_eq!(increment_ip(ip, 10).unwrap().to_string(), "192.168.11.9");
//!
//! let mac: MacAddr = "11:22:33:44:55:ff".parse().unwrap();
//! assert_eq!(increment_mac(mac, 1).unwrap().to_string(), "11:22:33:44:56:00");
//! ```

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

/// Largest integer value of an IPv4 address (255.255.255.255)
pub const MAX_IPV4_INT: u64 = 0xFFFF_FFFF;

/// Largest integer value of a MAC-48 address (ff:ff:ff:ff:ff:ff)
pub const MAX_MAC_INT: u64 = 0xFFFF_FFFF_FFFF;

/// Error types for address arithmetic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddrError {
    /// Integer does not fit the target byte width
    #[error("{value} is too big for a {width}-byte address")]
    ValueTooLarge { value: BigUint, width: usize },

    /// Address plus step is negative
    #[error("{addr} and step {step} result in a negative value")]
    Underflow { addr: String, step: BigInt },

    /// Address plus step exceeds the largest address of its width
    #[error("{addr} and step {step} exceed the largest {width}-byte address")]
    Overflow {
        addr: String,
        step: BigInt,
        width: usize,
    },

    /// Malformed MAC address text
    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),
}

/// Result type alias for address arithmetic
pub type Result<T> = std::result::Result<T, AddrError>;

/// IP address family
///
/// Carried explicitly next to integer values so that a 4-byte and a 16-byte
/// encoding are never confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddrFamily {
    V4,
    V6,
}

impl AddrFamily {
    /// Family of an address
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddrFamily::V4,
            IpAddr::V6(_) => AddrFamily::V6,
        }
    }

    /// Address length in bits (32 or 128)
    pub fn bits(&self) -> u32 {
        match self {
            AddrFamily::V4 => 32,
            AddrFamily::V6 => 128,
        }
    }

    /// Address length in bytes (4 or 16)
    pub fn width(&self) -> usize {
        self.bits() as usize / 8
    }

    /// Largest integer value an address of this family can hold
    pub fn max_value(&self) -> BigUint {
        max_for_width(self.width())
    }
}

impl fmt::Display for AddrFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddrFamily::V4 => write!(f, "IPv4"),
            AddrFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// MAC-48 hardware address
///
/// Parses colon- or hyphen-separated hex (`4a:08:5d:b5:91:ed`,
/// `4A-08-5D-B5-91-ED`) and displays lowercase with colons.
///
/// # Examples
///
/// ```
/// use addrkit_core::MacAddr;
///
/// let mac: MacAddr = "4A-08-5D-B5-91-ED".parse().unwrap();
/// assert_eq!(mac.octets(), [0x4a, 0x08, 0x5d, 0xb5, 0x91, 0xed]);
/// assert_eq!(mac.to_string(), "4a:08:5d:b5:91:ed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Number of bytes in a MAC-48 address
    pub const WIDTH: usize = 6;

    /// Create a MAC address from its octets
    pub fn new(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }

    /// Get the octets, most significant first
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }
}

impl From<MacAddr> for [u8; 6] {
    fn from(mac: MacAddr) -> Self {
        mac.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self> {
        let sep = if s.contains('-') { '-' } else { ':' };
        let parts: Vec<&str> = s.split(sep).collect();
        if parts.len() != Self::WIDTH {
            return Err(AddrError::InvalidMac(format!(
                "expected 6 octets, got {}: {}",
                parts.len(),
                s
            )));
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(AddrError::InvalidMac(format!("invalid octet: {}", part)));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| AddrError::InvalidMac(format!("invalid octet: {}", part)))?;
        }

        Ok(MacAddr(octets))
    }
}

fn max_for_width(width: usize) -> BigUint {
    (BigUint::one() << (width * 8)) - BigUint::one()
}

/// Interpret big-endian bytes as a non-negative integer
pub fn bytes_to_int(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Encode `n` as exactly `width` big-endian bytes, left-padded with zeros
///
/// Works for any width, so hardware addresses longer than MAC-48
/// (EUI-64, InfiniBand) are covered too.
///
/// # Examples
///
/// ```
/// use addrkit_core::int_to_bytes;
/// use num_bigint::BigUint;
///
/// assert_eq!(int_to_bytes(&BigUint::from(0x0102u32), 4).unwrap(), vec![0, 0, 1, 2]);
/// assert!(int_to_bytes(&BigUint::from(0x010203u32), 2).is_err());
/// ```
pub fn int_to_bytes(n: &BigUint, width: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; width];
    if n.is_zero() {
        return Ok(buf);
    }

    let needed = ((n.bits() + 7) / 8) as usize;
    if needed > width {
        return Err(AddrError::ValueTooLarge {
            value: n.clone(),
            width,
        });
    }

    let bytes = n.to_bytes_be();
    buf[width - bytes.len()..].copy_from_slice(&bytes);
    Ok(buf)
}

/// Integer value of an IP address (4 bytes for IPv4, 16 for IPv6)
pub fn ip_to_int(addr: IpAddr) -> BigUint {
    match addr {
        IpAddr::V4(v4) => bytes_to_int(&v4.octets()),
        IpAddr::V6(v6) => bytes_to_int(&v6.octets()),
    }
}

/// Build an address of the given family from its integer value
///
/// Fails with [`AddrError::ValueTooLarge`] rather than switching family when
/// the value does not fit.
pub fn int_to_ip(n: &BigUint, family: AddrFamily) -> Result<IpAddr> {
    let bytes = int_to_bytes(n, family.width())?;
    Ok(match family {
        AddrFamily::V4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&bytes);
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        AddrFamily::V6 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&bytes);
            IpAddr::V6(Ipv6Addr::from(octets))
        }
    })
}

/// Integer value of a MAC address
pub fn mac_to_int(mac: MacAddr) -> BigUint {
    bytes_to_int(&mac.0)
}

/// Build a MAC address from its integer value
pub fn int_to_mac(n: &BigUint) -> Result<MacAddr> {
    let bytes = int_to_bytes(n, MacAddr::WIDTH)?;
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&bytes);
    Ok(MacAddr(octets))
}

/// Add `step` to a fixed-width big-endian value, staying inside `[0, 2^(8*width) - 1]`
fn step_bytes(bytes: &[u8], step: BigInt, label: &dyn fmt::Display) -> Result<Vec<u8>> {
    let width = bytes.len();
    let sum = BigInt::from(bytes_to_int(bytes)) + &step;

    let Some(n) = sum.to_biguint() else {
        tracing::debug!(addr = %label, %step, "increment underflows");
        return Err(AddrError::Underflow {
            addr: label.to_string(),
            step,
        });
    };

    if n.bits() > (width * 8) as u64 {
        tracing::debug!(addr = %label, %step, width, "increment overflows");
        return Err(AddrError::Overflow {
            addr: label.to_string(),
            step,
            width,
        });
    }

    int_to_bytes(&n, width)
}

/// Increase an IP address by `step` (may be negative)
///
/// The result keeps the family of `addr`. Landing exactly on `0.0.0.0` or
/// `255.255.255.255` (and the IPv6 equivalents) is allowed; going past them
/// is [`AddrError::Underflow`] / [`AddrError::Overflow`].
///
/// # Examples
///
/// ```
/// use addrkit_core::{increment_ip, AddrError};
/// use std::net::IpAddr;
///
/// let ip: IpAddr = "255.255.255.254".parse().unwrap();
/// let last = increment_ip(ip, 1).unwrap();
/// assert_eq!(last.to_string(), "255.255.255.255");
/// assert!(matches!(increment_ip(last, 1), Err(AddrError::Overflow { .. })));
/// ```
pub fn increment_ip(addr: IpAddr, step: impl Into<BigInt>) -> Result<IpAddr> {
    let step = step.into();
    match addr {
        IpAddr::V4(v4) => {
            let bytes = step_bytes(&v4.octets(), step, &addr)?;
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&bytes);
            Ok(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        IpAddr::V6(v6) => {
            let bytes = step_bytes(&v6.octets(), step, &addr)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&bytes);
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
    }
}

/// Increase a MAC address by `step` (may be negative) within the 48-bit space
pub fn increment_mac(mac: MacAddr, step: impl Into<BigInt>) -> Result<MacAddr> {
    let bytes = step_bytes(&mac.0, step.into(), &mac)?;
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&bytes);
    Ok(MacAddr(octets))
}
