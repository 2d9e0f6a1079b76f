//! IP address safety classification.
//!
//! An address is safe to contact only if it is globally routable. Everything in
//! the IANA special-purpose registries that is private-use, loopback,
//! link-local, multicast, reserved, or unspecified is rejected, for both address
//! families. Classification is pure and is evaluated fresh on every call.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Why an address is not safe to contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsafeRange {
    /// `0.0.0.0/8`, `::`
    Unspecified,
    /// `127.0.0.0/8`, `::1`
    Loopback,
    /// RFC 1918, shared address space (CGNAT), unique-local and site-local IPv6
    Private,
    /// `169.254.0.0/16`, `fe80::/10`
    LinkLocal,
    /// `224.0.0.0/4`, `ff00::/8`
    Multicast,
    /// Documentation, benchmarking, protocol-assignment and future-use ranges
    Reserved,
}

impl UnsafeRange {
    /// Returns a short human-readable name for the range.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnsafeRange::Unspecified => "unspecified",
            UnsafeRange::Loopback => "loopback",
            UnsafeRange::Private => "private",
            UnsafeRange::LinkLocal => "link-local",
            UnsafeRange::Multicast => "multicast",
            UnsafeRange::Reserved => "reserved",
        }
    }
}

impl fmt::Display for UnsafeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which addresses a validator will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Only globally routable addresses (see [`is_safe`]).
    #[default]
    PublicOnly,
    /// Globally routable addresses plus loopback. Every other unsafe range is
    /// still rejected. Intended for local development against `127.0.0.1`.
    AllowLoopback,
}

impl Policy {
    /// Checks an address against this policy.
    ///
    /// Returns the range that made the address unacceptable, or `Ok(())`.
    pub fn check(self, ip: IpAddr) -> Result<(), UnsafeRange> {
        match (self, classify(ip)) {
            (_, None) => Ok(()),
            (Policy::AllowLoopback, Some(UnsafeRange::Loopback)) => Ok(()),
            (_, Some(range)) => Err(range),
        }
    }
}

/// Returns `true` if the address is globally routable.
///
/// # Examples
///
/// ```
/// use safe_fetch::is_safe;
/// use std::net::IpAddr;
///
/// assert!(is_safe("93.184.216.34".parse::<IpAddr>().unwrap()));
/// assert!(!is_safe("169.254.169.254".parse::<IpAddr>().unwrap()));
/// assert!(!is_safe("::1".parse::<IpAddr>().unwrap()));
/// ```
pub fn is_safe(ip: IpAddr) -> bool {
    classify(ip).is_none()
}

/// Classifies an address, returning the unsafe range it falls in, if any.
pub fn classify(ip: IpAddr) -> Option<UnsafeRange> {
    match ip {
        IpAddr::V4(v4) => classify_ipv4(v4),
        IpAddr::V6(v6) => classify_ipv6(v6),
    }
}

fn classify_ipv4(ip: Ipv4Addr) -> Option<UnsafeRange> {
    let o = ip.octets();
    match o {
        // This-network 0.0.0.0/8
        [0, ..] => Some(UnsafeRange::Unspecified),
        // Private 10.0.0.0/8
        [10, ..] => Some(UnsafeRange::Private),
        // Shared address space (CGNAT) 100.64.0.0/10
        [100, b, ..] if (64..=127).contains(&b) => Some(UnsafeRange::Private),
        // Loopback 127.0.0.0/8
        [127, ..] => Some(UnsafeRange::Loopback),
        // Link-local 169.254.0.0/16 (cloud metadata lives here)
        [169, 254, ..] => Some(UnsafeRange::LinkLocal),
        // Private 172.16.0.0/12
        [172, b, ..] if (16..=31).contains(&b) => Some(UnsafeRange::Private),
        // IETF protocol assignments 192.0.0.0/24
        [192, 0, 0, _] => Some(UnsafeRange::Reserved),
        // TEST-NET-1 192.0.2.0/24
        [192, 0, 2, _] => Some(UnsafeRange::Reserved),
        // Private 192.168.0.0/16
        [192, 168, ..] => Some(UnsafeRange::Private),
        // Benchmarking 198.18.0.0/15
        [198, 18 | 19, ..] => Some(UnsafeRange::Reserved),
        // TEST-NET-2 198.51.100.0/24
        [198, 51, 100, _] => Some(UnsafeRange::Reserved),
        // TEST-NET-3 203.0.113.0/24
        [203, 0, 113, _] => Some(UnsafeRange::Reserved),
        // Multicast 224.0.0.0/4
        [224..=239, ..] => Some(UnsafeRange::Multicast),
        // Reserved 240.0.0.0/4, including broadcast
        [240..=255, ..] => Some(UnsafeRange::Reserved),
        _ => None,
    }
}

fn classify_ipv6(ip: Ipv6Addr) -> Option<UnsafeRange> {
    let s = ip.segments();

    if ip.is_unspecified() {
        return Some(UnsafeRange::Unspecified);
    }
    if ip.is_loopback() {
        return Some(UnsafeRange::Loopback);
    }
    // ::ffff:0:0/96 carries an IPv4 address the socket layer will use as-is
    if let Some(v4) = ip.to_ipv4_mapped() {
        return classify_ipv4(v4);
    }
    // NAT64 well-known prefix 64:ff9b::/96 translates to the embedded IPv4 address
    if s[..6] == [0x64, 0xff9b, 0, 0, 0, 0] {
        let [a, b] = s[6].to_be_bytes();
        let [c, d] = s[7].to_be_bytes();
        return classify_ipv4(Ipv4Addr::new(a, b, c, d));
    }
    // ff00::/8 multicast
    if s[0] & 0xff00 == 0xff00 {
        return Some(UnsafeRange::Multicast);
    }
    // fe80::/10 link-local
    if s[0] & 0xffc0 == 0xfe80 {
        return Some(UnsafeRange::LinkLocal);
    }
    // fec0::/10 site-local (deprecated) and fc00::/7 unique-local
    if s[0] & 0xffc0 == 0xfec0 || s[0] & 0xfe00 == 0xfc00 {
        return Some(UnsafeRange::Private);
    }
    // Only 2000::/3 is allocated as global unicast
    if s[0] & 0xe000 != 0x2000 {
        return Some(UnsafeRange::Reserved);
    }
    // 2001::/23 IETF protocol assignments (Teredo, benchmarking, ORCHID)
    if s[0] == 0x2001 && s[1] < 0x0200 {
        return Some(UnsafeRange::Reserved);
    }
    // 2001:db8::/32 documentation
    if s[0] == 0x2001 && s[1] == 0x0db8 {
        return Some(UnsafeRange::Reserved);
    }
    // 2002::/16 6to4 embeds an arbitrary IPv4 address
    if s[0] == 0x2002 {
        return Some(UnsafeRange::Reserved);
    }
    None
}
