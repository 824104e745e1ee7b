use std::net::Ipv4Addr;

/// Shortest prefix accepted for address pools (a /8 already holds 2^24 addresses)
pub const MIN_PREFIX_LEN: u8 = 8;

/// Parse an IPv4 CIDR block (e.g., "192.168.0.0/24").
/// Returns (network, broadcast, prefix_length) as integers.
/// Host bits must be zero, matching strict network parsing.
pub fn parse_cidr(cidr: &str) -> Result<(u32, u32, u8), String> {
    let (addr, len) = cidr
        .trim()
        .split_once('/')
        .ok_or_else(|| format!("missing prefix length in '{}'", cidr))?;

    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|_| format!("invalid IPv4 address '{}'", addr))?;
    let prefix_len: u8 = len
        .parse()
        .map_err(|_| format!("invalid prefix length '{}'", len))?;
    if prefix_len > 32 {
        return Err(format!("prefix length {} exceeds 32", prefix_len));
    }

    let mask = prefix_mask(prefix_len);
    let addr = ipv4_to_u32(addr);
    if addr & !mask != 0 {
        return Err(format!("'{}' has host bits set", cidr));
    }

    Ok((addr, addr | !mask, prefix_len))
}

fn prefix_mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len)
    }
}

pub fn ipv4_to_u32(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}

/// Render an integer address in dotted-quad form
pub fn u32_to_ipv4(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Numeric value of a dotted-quad string, or None if it does not parse
pub fn ipv4_sort_key(ip: &str) -> Option<u32> {
    ip.parse::<Ipv4Addr>().ok().map(ipv4_to_u32)
}

/// Validate a colon-separated, six-octet MAC address (e.g., "00:0a:1b:2c:3d:4e")
#[cfg(test)]
pub(crate) fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr() {
        let (network, broadcast, len) = parse_cidr("192.168.0.0/24").unwrap();
        assert_eq!(u32_to_ipv4(network), "192.168.0.0");
        assert_eq!(u32_to_ipv4(broadcast), "192.168.0.255");
        assert_eq!(len, 24);

        let (network, broadcast, len) = parse_cidr("10.1.2.3/32").unwrap();
        assert_eq!(network, broadcast);
        assert_eq!(len, 32);
    }

    #[test]
    fn test_parse_cidr_rejects_malformed() {
        assert!(parse_cidr("").is_err());
        assert!(parse_cidr("192.168.0.0").is_err());
        assert!(parse_cidr("192.168.0/24").is_err());
        assert!(parse_cidr("256.168.0.0/24").is_err());
        assert!(parse_cidr("192.168.0.0/33").is_err());
        assert!(parse_cidr("192.168.0.0/abc").is_err());
        assert!(parse_cidr("192.168.0.1/24").is_err()); // host bits set
    }

    #[test]
    fn test_ipv4_sort_key_is_numeric() {
        // Lexicographically "10.0.0.10" < "10.0.0.9"; numerically it is not
        let a = ipv4_sort_key("10.0.0.9").unwrap();
        let b = ipv4_sort_key("10.0.0.10").unwrap();
        assert!(a < b);
        assert_eq!(ipv4_sort_key("not-an-ip"), None);
    }

    #[test]
    fn test_is_valid_mac() {
        assert!(is_valid_mac("00:0a:1b:2c:3d:4e"));
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(!is_valid_mac("00:0a:1b:2c:3d"));
        assert!(!is_valid_mac("00-0a-1b-2c-3d-4e"));
        assert!(!is_valid_mac("00:0a:1b:2c:3d:4"));
    }
}
