//! Re-group per-host series by IPv4 network address.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScanError;
use crate::series::{KeyedSeries, Observation, sort_chronologically};

static HOST_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)/([0-9]+)$")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// Mask an `A.B.C.D/prefix` key down to its dotted network address.
///
/// Octets above 255 and prefixes above 32 are not rejected: octets are taken
/// modulo their place in the 32-bit address, and a prefix outside `1..=32`
/// masks everything away.
pub fn network_address(key: &str) -> Result<String, ScanError> {
    let caps = HOST_KEY
        .captures(key)
        .ok_or_else(|| ScanError::MalformedNetworkKey {
            key: key.to_string(),
        })?;
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let ip = (1..=4).fold(0u32, |acc, i| {
        acc.wrapping_mul(256).wrapping_add(wrapping_decimal(field(i)))
    });
    let prefix = saturating_decimal(field(5));
    let net = ip & prefix_mask(prefix);

    let [a, b, c, d] = net.to_be_bytes();
    Ok(format!("{a}.{b}.{c}.{d}"))
}

/// Decimal digits reduced modulo 2^32.
fn wrapping_decimal(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |acc, b| {
        acc.wrapping_mul(10).wrapping_add(u32::from(b - b'0'))
    })
}

fn saturating_decimal(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

/// Netmask with the top `prefix` bits set.
fn prefix_mask(prefix: u32) -> u32 {
    match prefix {
        1..=32 => u32::MAX << (32 - prefix),
        _ => 0,
    }
}

/// Merge host groups that share a network address, re-sorted by timestamp.
///
/// The first key that does not look like `A.B.C.D/prefix` aborts the whole
/// aggregation.
pub fn aggregate_by_network<T>(by_host: &KeyedSeries<T>) -> Result<KeyedSeries<T>, ScanError>
where
    T: Observation + Clone,
{
    let mut by_network: KeyedSeries<T> = KeyedSeries::new();
    for (key, group) in by_host {
        let net = network_address(key)?;
        by_network.entry(net).or_default().extend(group.iter().cloned());
    }
    for group in by_network.values_mut() {
        sort_chronologically(group);
    }
    tracing::debug!(
        hosts = by_host.len(),
        networks = by_network.len(),
        "aggregated by network address"
    );
    Ok(by_network)
}
