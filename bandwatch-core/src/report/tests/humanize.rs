use super::at;
use crate::report::{format_absolute, format_iec, format_relative};
use pretty_assertions::assert_eq;

#[test]
fn test_format_iec() {
    let cases = [
        (0, "0 B"),
        (9, "9 B"),
        (1000, "1000 B"),
        (1024, "1.0 KiB"),
        (1536, "1.5 KiB"),
        (10 * 1024, "10 KiB"),
        (5 * 1024 * 1024 * 1024, "5.0 GiB"),
        (300 * 1024 * 1024 * 1024, "300 GiB"),
    ];
    for (bytes, expected) in cases {
        assert_eq!(format_iec(bytes), expected, "{bytes}");
    }
}

#[test]
fn test_format_relative() {
    let now = at(1_000_000);
    let cases = [
        (0, "now"),
        (1, "1 second ago"),
        (30, "30 seconds ago"),
        (90, "1 minute ago"),
        (600, "10 minutes ago"),
        (3 * 3600, "3 hours ago"),
        (86_400 + 10, "1 day ago"),
        (-120, "2 minutes from now"),
    ];
    for (ago, expected) in cases {
        assert_eq!(format_relative(Some(at(1_000_000 - ago)), now), expected, "{ago}");
    }
}

#[test]
fn test_unknown_time_renders_dash() {
    assert_eq!(format_relative(None, at(0)), "-");
    assert_eq!(format_absolute(None), "-");
}

#[test]
fn test_absolute_time_shape() {
    let rendered = format_absolute(Some(at(0)));
    assert_eq!(rendered.len(), "2023-11-14 22:13:20".len());
    assert_eq!(&rendered[4..5], "-");
    assert_eq!(&rendered[10..11], " ");
}
