use rand::Rng;

use crate::models::Interface;

/// Label given to every synthesized interface
pub const DEFAULT_INTERFACE_LABEL: &str = "eth0";

/// Build the single interface of a generated endpoint
pub fn make_interface<R: Rng + ?Sized>(endpoint_id: &str, address: &str, rng: &mut R) -> Interface {
    Interface {
        label: DEFAULT_INTERFACE_LABEL.to_string(),
        interface_id: format!("{}_{}", endpoint_id, DEFAULT_INTERFACE_LABEL),
        ipv4: address.to_string(),
        ipv6: None,
        mac: generate_mac(rng),
    }
}

/// Generate a MAC shaped like 00:0X:YY:ZZ:ZZ:ZZ with random X (one nibble), YY and ZZ.
/// Collisions are possible and acceptable; only IPv4 addresses must be unique.
pub fn generate_mac<R: Rng + ?Sized>(rng: &mut R) -> String {
    let nibble: u8 = rng.gen_range(0..16);
    let mut tail = [0u8; 4];
    rng.fill(&mut tail);
    format!(
        "00:0{:01x}:{:02x}:{:02x}:{:02x}:{:02x}",
        nibble, tail[0], tail[1], tail[2], tail[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_valid_mac;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_make_interface() {
        let mut rng = StdRng::seed_from_u64(3);
        let iface = make_interface("10.0.0.5", "10.0.0.5", &mut rng);
        assert_eq!(iface.label, "eth0");
        assert_eq!(iface.interface_id, "10.0.0.5_eth0");
        assert_eq!(iface.ipv4, "10.0.0.5");
        assert!(iface.ipv6.is_none());
        assert!(is_valid_mac(&iface.mac));
    }

    #[test]
    fn test_generate_mac_prefix() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let mac = generate_mac(&mut rng);
            assert!(is_valid_mac(&mac), "bad MAC {}", mac);
            assert!(mac.starts_with("00:0"));
        }
    }

    #[test]
    fn test_generate_mac_is_seeded() {
        let a = generate_mac(&mut StdRng::seed_from_u64(5));
        let b = generate_mac(&mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
