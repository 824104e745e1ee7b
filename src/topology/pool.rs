use std::collections::VecDeque;

use rand::Rng;

use super::TopologyError;
use crate::utils::{self, MIN_PREFIX_LEN};

/// AddressPool hands out the usable addresses of one CIDR block, each at most once.
///
/// Addresses are kept in ascending order so head and tail draws return the lowest
/// and highest remaining address. The network address is never part of the pool.
#[derive(Debug, Clone)]
pub struct AddressPool {
    addresses: VecDeque<u32>,
}

impl AddressPool {
    pub fn new(cidr_block: &str) -> Result<Self, TopologyError> {
        let (network, broadcast, prefix_len) =
            utils::parse_cidr(cidr_block).map_err(|reason| TopologyError::InvalidCidr {
                cidr: cidr_block.to_string(),
                reason,
            })?;
        if prefix_len < MIN_PREFIX_LEN {
            return Err(TopologyError::InvalidCidr {
                cidr: cidr_block.to_string(),
                reason: format!("prefix must be /{} or longer", MIN_PREFIX_LEN),
            });
        }

        // Skip the network address; /32 leaves an empty pool
        let addresses = if network == broadcast {
            VecDeque::new()
        } else {
            (network + 1..=broadcast).collect()
        };

        Ok(Self { addresses })
    }

    pub fn remaining(&self) -> usize {
        self.addresses.len()
    }

    /// Whether `ip` is a dotted quad still available in the pool
    pub fn contains(&self, ip: &str) -> bool {
        utils::ipv4_sort_key(ip)
            .map(|addr| self.addresses.binary_search(&addr).is_ok())
            .unwrap_or(false)
    }

    /// Remove and return the lowest remaining address
    pub fn take_from_head(&mut self) -> Result<String, TopologyError> {
        self.addresses
            .pop_front()
            .map(utils::u32_to_ipv4)
            .ok_or(TopologyError::PoolExhausted { requested: 1, available: 0 })
    }

    /// Remove and return the highest remaining address
    pub fn take_from_tail(&mut self) -> Result<String, TopologyError> {
        self.addresses
            .pop_back()
            .map(utils::u32_to_ipv4)
            .ok_or(TopologyError::PoolExhausted { requested: 1, available: 0 })
    }

    /// Remove and return a uniformly chosen remaining address
    pub fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, TopologyError> {
        if self.addresses.is_empty() {
            return Err(TopologyError::PoolExhausted { requested: 1, available: 0 });
        }
        let idx = rng.gen_range(0..self.addresses.len());
        self.addresses
            .remove(idx)
            .map(utils::u32_to_ipv4)
            .ok_or(TopologyError::PoolExhausted { requested: 1, available: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_pool_excludes_network_address() {
        let mut pool = AddressPool::new("192.168.0.0/24").unwrap();
        assert_eq!(pool.remaining(), 255);
        assert_eq!(pool.take_from_head().unwrap(), "192.168.0.1");
        assert_eq!(pool.take_from_tail().unwrap(), "192.168.0.255");
        assert_eq!(pool.remaining(), 253);
    }

    #[test]
    fn test_pool_small_blocks() {
        assert_eq!(AddressPool::new("10.0.0.0/32").unwrap().remaining(), 0);
        assert_eq!(AddressPool::new("10.0.0.0/31").unwrap().remaining(), 1);
        assert_eq!(AddressPool::new("10.0.0.0/30").unwrap().remaining(), 3);
    }

    #[test]
    fn test_pool_invalid_cidr() {
        assert!(matches!(
            AddressPool::new("192.168.0.1/24"),
            Err(TopologyError::InvalidCidr { .. })
        ));
        assert!(matches!(
            AddressPool::new("bogus"),
            Err(TopologyError::InvalidCidr { .. })
        ));
        assert!(matches!(
            AddressPool::new("0.0.0.0/0"),
            Err(TopologyError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_pool_never_reissues() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = AddressPool::new("172.16.0.0/28").unwrap();
        let mut seen = HashSet::new();
        while pool.remaining() > 0 {
            let ip = match pool.remaining() % 3 {
                0 => pool.take_from_head(),
                1 => pool.take_from_tail(),
                _ => pool.take_random(&mut rng),
            }
            .unwrap();
            assert!(seen.insert(ip), "address issued twice");
        }
        assert_eq!(seen.len(), 15);
        assert!(!seen.contains("172.16.0.0"));
    }

    #[test]
    fn test_pool_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = AddressPool::new("10.0.0.0/31").unwrap();
        assert_eq!(pool.take_random(&mut rng).unwrap(), "10.0.0.1");
        assert!(matches!(pool.take_from_head(), Err(TopologyError::PoolExhausted { .. })));
        assert!(matches!(pool.take_from_tail(), Err(TopologyError::PoolExhausted { .. })));
        assert!(matches!(
            pool.take_random(&mut rng),
            Err(TopologyError::PoolExhausted { .. })
        ));
    }

    #[test]
    fn test_head_tail_after_random_draws() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = AddressPool::new("10.0.0.0/29").unwrap();
        let drawn = pool.take_random(&mut rng).unwrap();
        let head = pool.take_from_head().unwrap();
        let tail = pool.take_from_tail().unwrap();
        assert_ne!(head, drawn);
        assert_ne!(tail, drawn);
        let key = |ip: &str| utils::ipv4_sort_key(ip).unwrap();
        assert!(key(&head) < key(&tail));
    }

    #[test]
    fn test_contains_tracks_draws() {
        let mut pool = AddressPool::new("10.0.0.0/30").unwrap();
        assert!(pool.contains("10.0.0.1"));
        assert!(!pool.contains("10.0.0.0"));
        assert!(!pool.contains("10.0.1.1"));
        assert!(!pool.contains("corp"));
        pool.take_from_head().unwrap();
        assert!(!pool.contains("10.0.0.1"));
    }
}
