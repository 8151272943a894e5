use crate::stats::PrefixLengths;
use ipnet::IpNet;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Established TCP connections per client network.
pub type ConnectionCounts = HashMap<IpNet, usize>;

const PROC_NET_TCP: [&str; 2] = ["/proc/net/tcp", "/proc/net/tcp6"];

/// Kernel socket state code for `ESTABLISHED`.
const TCP_ESTABLISHED: &str = "01";

/// Counts established connections by remote address, masked to `prefixes`.
///
/// Reads both the IPv4 and IPv6 socket tables. A table that cannot be read
/// fails the whole call.
pub fn active_connections(prefixes: &PrefixLengths) -> io::Result<ConnectionCounts> {
    let mut counts = ConnectionCounts::new();
    for path in PROC_NET_TCP {
        let text = fs::read_to_string(path)?;
        parse_proc_net(&text, prefixes, &mut counts);
    }
    Ok(counts)
}

/// Adds the established sockets listed in a `/proc/net/tcp{,6}` dump to
/// `counts`. Malformed rows are skipped.
pub fn parse_proc_net(text: &str, prefixes: &PrefixLengths, counts: &mut ConnectionCounts) {
    for line in text.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let (Some(_slot), Some(_local), Some(remote), Some(state)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if state != TCP_ESTABLISHED {
            continue;
        }

        let Some(addr) = remote.split_once(':').and_then(|(hex, _)| decode_addr(hex)) else {
            continue;
        };
        *counts.entry(prefixes.mask(addr)).or_default() += 1;
    }
}

/// The kernel prints addresses as host-order 32-bit words in hex.
fn decode_addr(hex: &str) -> Option<IpAddr> {
    match hex.len() {
        8 => {
            let word = u32::from_str_radix(hex, 16).ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(word.to_ne_bytes())))
        }
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_exact_mut(4).enumerate() {
                let word = u32::from_str_radix(hex.get(i * 8..i * 8 + 8)?, 16).ok()?;
                chunk.copy_from_slice(&word.to_ne_bytes());
            }
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}
