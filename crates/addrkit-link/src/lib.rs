//! IPv6 link-local derivation and connection string formatting
//!
//! - [`link_local_from_mac`] - `fe80::/64` address from a MAC (RFC 4291 Appendix A)
//! - [`connection_string`] - `<prefix><ip>:<port>`, bracketing IPv6 hosts
//!
//! ```
//! use addrkit_core::MacAddr;
//! use addrkit_link::{connection_string, link_local_from_mac};
//!
//! let mac: MacAddr = "4a:08:5d:b5:91:ed".parse().unwrap();
//! let lla = link_local_from_mac(mac);
//! assert_eq!(lla.to_string(), "fe80::4808:5dff:feb5:91ed");
//! assert_eq!(
//!     connection_string("http://", lla.into(), 8043),
//!     "http://[fe80::4808:5dff:feb5:91ed]:8043"
//! );
//! ```

use addrkit_core::MacAddr;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

/// Universal/local bit of the first MAC octet
const UNIVERSAL_LOCAL_BIT: u8 = 0b0000_0010;

/// Modified EUI-64 interface identifier for a MAC address
///
/// Flips the universal/local bit and inserts `ff:fe` in the middle.
pub fn eui64_interface_id(mac: MacAddr) -> [u8; 8] {
    let m = mac.octets();
    [
        m[0] ^ UNIVERSAL_LOCAL_BIT,
        m[1],
        m[2],
        0xff,
        0xfe,
        m[3],
        m[4],
        m[5],
    ]
}

/// IPv6 link-local address (`fe80::/64` + modified EUI-64) for a MAC address
pub fn link_local_from_mac(mac: MacAddr) -> Ipv6Addr {
    let mut octets = [0u8; 16];
    octets[0] = 0xfe;
    octets[1] = 0x80;
    octets[8..].copy_from_slice(&eui64_interface_id(mac));
    Ipv6Addr::from(octets)
}

/// Format `<prefix><ip>:<port>`, writing IPv6 hosts as `[ip]`
///
/// # Examples
///
/// ```
/// use addrkit_link::connection_string;
///
/// let v4 = "192.168.1.1".parse().unwrap();
/// assert_eq!(connection_string("http://", v4, 8043), "http://192.168.1.1:8043");
///
/// let v6 = "2001:dead::1".parse().unwrap();
/// assert_eq!(connection_string("http://", v6, 8043), "http://[2001:dead::1]:8043");
/// ```
pub fn connection_string(prefix: &str, ip: IpAddr, port: u16) -> String {
    format!("{}{}", prefix, SocketAddr::new(ip, port))
}
