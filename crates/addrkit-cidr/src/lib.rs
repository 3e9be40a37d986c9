//! IPv4/IPv6 prefixes and host-offset address generation
//!
//! Provides utilities for working with CIDR notation:
//! - Parse CIDR notation (e.g., "192.168.0.0/24", "2001:db8::/64")
//! - Network address, host space size and containment
//! - Generate the address at a given host offset inside a prefix
//!
//! # Examples
//!
//! ```
//! use addrkit_cidr::Prefix;
//!
//! let prefix = Prefix::parse("192.168.1.200/24").unwrap();
//! assert_eq!(prefix.prefix_len(), 24);
//! assert_eq!(prefix.network().to_string(), "192.168.1.0");
//! assert_eq!(prefix.host(100).unwrap().to_string(), "192.168.1.100");
//! assert!(prefix.host(256).is_err());
//! ```

use addrkit_core::{increment_ip, AddrError, AddrFamily};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

/// CIDR errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    /// Invalid CIDR notation
    #[error("Invalid CIDR notation: {0}")]
    InvalidNotation(String),

    /// Invalid IP address
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    /// Invalid prefix length
    #[error("Invalid prefix length: {len} (must be 0-{max})")]
    InvalidPrefixLength { len: u8, max: u32 },

    /// Host offset below zero
    #[error("Host offset {0} is negative")]
    NegativeOffset(BigInt),

    /// Host offset outside the prefix
    #[error("Host offset {offset} exceeds the host space of {prefix}")]
    OffsetOutOfRange { offset: BigInt, prefix: String },

    /// Arithmetic failure on the generated address
    #[error(transparent)]
    Addr(#[from] AddrError),
}

pub type Result<T> = std::result::Result<T, CidrError>;

/// Address plus prefix length
///
/// The address is stored as given, host bits included, so a `Prefix` can
/// also describe an interface address such as `192.168.1.100/24`. Use
/// [`Prefix::network`] or [`Prefix::masked`] for the block itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPrefix")]
pub struct Prefix {
    addr: IpAddr,
    len: u8,
}

impl Prefix {
    /// Parse CIDR notation string
    ///
    /// # Arguments
    ///
    /// * `cidr` - CIDR string (e.g., "192.168.1.0/24" or "2001:db8::/32")
    ///
    /// # Examples
    ///
    /// ```
    /// use addrkit_cidr::Prefix;
    ///
    /// let prefix = Prefix::parse("2001:dead:beef::/64").unwrap();
    /// assert_eq!(prefix.prefix_len(), 64);
    /// ```
    pub fn parse(cidr: &str) -> Result<Self> {
        let (ip_str, len_str) = cidr.split_once('/').ok_or_else(|| {
            CidrError::InvalidNotation("Expected format: address/prefix".to_string())
        })?;

        let len: u8 = len_str
            .parse()
            .map_err(|_| CidrError::InvalidNotation(format!("Invalid prefix: {}", len_str)))?;

        let addr: IpAddr = ip_str
            .parse()
            .map_err(|_| CidrError::InvalidIpAddress(ip_str.to_string()))?;

        Self::new(addr, len)
    }

    /// Create new prefix from an address and prefix length
    ///
    /// # Arguments
    ///
    /// * `addr` - Any address inside the block (host bits are kept)
    /// * `len` - Prefix length (0-32 for IPv4, 0-128 for IPv6)
    pub fn new(addr: IpAddr, len: u8) -> Result<Self> {
        let max = AddrFamily::of(&addr).bits();
        if u32::from(len) > max {
            return Err(CidrError::InvalidPrefixLength { len, max });
        }

        Ok(Self { addr, len })
    }

    /// Get the address as given
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Get prefix length
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Get address family
    pub fn family(&self) -> AddrFamily {
        AddrFamily::of(&self.addr)
    }

    /// Get network address (host bits cleared)
    pub fn network(&self) -> IpAddr {
        match self.addr {
            IpAddr::V4(v4) => {
                let mask = if self.len == 0 {
                    0
                } else {
                    u32::MAX << (32 - u32::from(self.len))
                };
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                let mask = if self.len == 0 {
                    0
                } else {
                    u128::MAX << (128 - u32::from(self.len))
                };
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        }
    }

    /// Same prefix with host bits cleared
    pub fn masked(&self) -> Self {
        Self {
            addr: self.network(),
            len: self.len,
        }
    }

    /// Get total number of addresses in this block: 2^(bits - len)
    pub fn size(&self) -> BigUint {
        BigUint::one() << (self.family().bits() - u32::from(self.len))
    }

    /// Check if IP address is in this block
    pub fn contains(&self, ip: IpAddr) -> bool {
        if AddrFamily::of(&ip) != self.family() {
            return false;
        }
        Self { addr: ip, len: self.len }.network() == self.network()
    }

    /// Address at `offset` from the network address
    ///
    /// Fails with [`CidrError::NegativeOffset`] for negative offsets and
    /// [`CidrError::OffsetOutOfRange`] when `offset >= self.size()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use addrkit_cidr::Prefix;
    ///
    /// let prefix = Prefix::parse("2001:dead:beef::/64").unwrap();
    /// assert_eq!(prefix.host(100_000).unwrap().to_string(), "2001:dead:beef::1:86a0");
    /// ```
    pub fn host(&self, offset: impl Into<BigInt>) -> Result<IpAddr> {
        let offset = offset.into();

        let Some(host) = offset.to_biguint() else {
            tracing::debug!(prefix = %self, %offset, "negative host offset");
            return Err(CidrError::NegativeOffset(offset));
        };

        if host >= self.size() {
            tracing::debug!(prefix = %self, %offset, "host offset out of range");
            return Err(CidrError::OffsetOutOfRange {
                offset,
                prefix: self.to_string(),
            });
        }

        let addr = increment_ip(self.network(), offset)?;
        tracing::trace!(prefix = %self, %addr, "generated host address");
        Ok(addr)
    }

    /// Like [`Prefix::host`] but keeps this prefix's length on the result
    ///
    /// ```
    /// use addrkit_cidr::Prefix;
    ///
    /// let prefix = Prefix::parse("10.1.0.0/16").unwrap();
    /// assert_eq!(prefix.host_prefix(258).unwrap().to_string(), "10.1.1.2/16");
    /// ```
    pub fn host_prefix(&self, offset: impl Into<BigInt>) -> Result<Self> {
        Ok(Self {
            addr: self.host(offset)?,
            len: self.len,
        })
    }
}

#[derive(Deserialize)]
struct RawPrefix {
    addr: IpAddr,
    len: u8,
}

impl TryFrom<RawPrefix> for Prefix {
    type Error = CidrError;

    fn try_from(raw: RawPrefix) -> Result<Self> {
        Self::new(raw.addr, raw.len)
    }
}

impl FromStr for Prefix {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}
