use crate::models::Element;
use crate::utils::ipv4_sort_key;

/// Sort endpoints ascending by the numeric value of their primary IPv4 address.
///
/// Elements without a parseable address sort after all addressed ones, keeping
/// their relative order.
pub fn sort_by_address(elements: &mut [Element]) {
    elements.sort_by_key(|e| match e.primary_ipv4().and_then(ipv4_sort_key) {
        Some(key) => (0u8, key),
        None => (1u8, 0),
    });
}
