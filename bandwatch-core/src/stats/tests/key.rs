use crate::config::ConfigError;
use crate::stats::{PrefixLengths, StatKey, parent, sibling};
use ipnet::IpNet;
use pretty_assertions::assert_eq;
use std::net::IpAddr;

fn net(s: &str) -> IpNet {
    s.parse().unwrap()
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn test_sibling_pairs() {
    let cases = [
        ("1.2.3.0/24", "1.2.2.0/24"),
        ("1.2.2.0/23", "1.2.0.0/23"),
        ("2001:db8:114:514::/64", "2001:db8:114:515::/64"),
        ("2001:db8:114:514::/63", "2001:db8:114:516::/63"),
    ];
    for (a, b) in cases {
        assert_eq!(sibling(net(a)), Some(net(b)), "sibling of {a}");
        assert_eq!(sibling(net(b)), Some(net(a)), "sibling of {b}");
    }
}

#[test]
fn test_sibling_is_involution() {
    for s in [
        "0.0.0.0/1",
        "128.0.0.0/1",
        "10.0.0.0/8",
        "192.168.7.0/24",
        "203.0.113.77/32",
        "::/1",
        "2001:db8::/48",
        "2001:db8::1/128",
    ] {
        let p = net(s);
        let once = sibling(p).unwrap();
        assert_ne!(once, p);
        assert_eq!(once.prefix_len(), p.prefix_len());
        assert_eq!(sibling(once), Some(p), "round trip for {s}");
    }
}

#[test]
fn test_root_has_no_sibling() {
    assert_eq!(sibling(net("0.0.0.0/0")), None);
    assert_eq!(sibling(net("::/0")), None);
}

#[test]
fn test_parent_covers_both_siblings() {
    let a = net("10.0.1.0/24");
    let b = sibling(a).unwrap();
    let p = parent(a).unwrap();

    assert_eq!(p, net("10.0.0.0/23"));
    assert_eq!(parent(b), Some(p));
    assert!(p.contains(&a) && p.contains(&b));
}

#[test]
fn test_mask_uses_family_length() {
    let lengths = PrefixLengths::new(24, 48).unwrap();

    assert_eq!(lengths.mask(ip("10.0.0.77")), net("10.0.0.0/24"));
    assert_eq!(lengths.mask(ip("2001:db8:1:2::3")), net("2001:db8:1::/48"));
}

#[test]
fn test_mask_unmaps_v4_in_v6() {
    let lengths = PrefixLengths::new(24, 48).unwrap();
    assert_eq!(lengths.mask(ip("::ffff:192.0.2.9")), net("192.0.2.0/24"));
}

#[test]
fn test_mask_extremes() {
    let lengths = PrefixLengths::new(0, 128).unwrap();
    assert_eq!(lengths.mask(ip("198.51.100.1")), net("0.0.0.0/0"));
    assert_eq!(lengths.mask(ip("2001:db8::1")), net("2001:db8::1/128"));
}

#[test]
fn test_lengths_validated() {
    assert!(matches!(
        PrefixLengths::new(33, 48),
        Err(ConfigError::PrefixV4(33))
    ));
    assert!(matches!(
        PrefixLengths::new(24, 129),
        Err(ConfigError::PrefixV6(129))
    ));
}

#[test]
fn test_key_display() {
    assert_eq!(StatKey::new("", net("10.0.0.0/24")).to_string(), "10.0.0.0/24");
    assert_eq!(
        StatKey::new("mirrors", net("10.0.0.0/24")).to_string(),
        "10.0.0.0/24@mirrors"
    );
}
