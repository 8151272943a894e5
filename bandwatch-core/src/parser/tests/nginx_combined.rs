use crate::parser::{NginxCombinedParser, ParseError, Parser};
use chrono::{FixedOffset, TimeZone};
use pretty_assertions::assert_eq;

#[test]
fn test_parse_line() {
    let line = br#"123.45.67.8 - - [12/Mar/2023:00:15:32 +0800] "GET /path/to/a/file HTTP/1.1" 200 3009 "-" """#;
    let event = NginxCombinedParser.parse(line).unwrap();

    assert_eq!(event.size, 3009);
    assert_eq!(event.client, "123.45.67.8");
    assert_eq!(event.url, "/path/to/a/file");
    assert_eq!(event.user_agent, "");
    let expected = FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2023, 3, 12, 0, 15, 32)
        .unwrap();
    assert_eq!(event.time, expected);
}

#[test]
fn test_ipv6_client() {
    let line = br#"2001:db8::1 - alice [12/Mar/2023:00:15:32 +0000] "GET / HTTP/2.0" 200 1 "-" "ua""#;
    let event = NginxCombinedParser.parse(line).unwrap();
    assert_eq!(event.client, "2001:db8::1");
    assert_eq!(event.user_agent, "ua");
}

#[test]
fn test_request_without_method() {
    let line = br#"114.5.1.4 - - [04/Apr/2024:08:01:12 +0800] "\x16\x03\x01\x00\xCA\x01\x00\x00\xC6\x03\x03\x94b\x22\x06u\xBEi\xF6\xC5cA\x97eq\xF0\xD5\xD3\xE6\x08I" 400 163 "-" "-""#;
    let event = NginxCombinedParser.parse(line).unwrap();

    assert_eq!(
        event.url,
        r#"\x16\x03\x01\x00\xCA\x01\x00\x00\xC6\x03\x03\x94b\x22\x06u\xBEi\xF6\xC5cA\x97eq\xF0\xD5\xD3\xE6\x08I"#
    );
    assert_eq!(event.size, 163);
}

#[test]
fn test_request_with_stray_space() {
    let line = br#"114.5.1.5 - - [04/Apr/2024:09:02:13 +0800] "\x16\x03\xF2\xF9 ~W\xB9\x94Qs\x01" 400 163 "-" "-""#;
    let event = NginxCombinedParser.parse(line).unwrap();
    assert_eq!(event.url, r#"~W\xB9\x94Qs\x01"#);
}

#[test]
fn test_backslash_escaped_quotes() {
    let line = br#"172.17.0.1 - - [10/Sep/2024:21:18:44 +0000] "GET /aaaaa\"\"\" HTTP/1.1" 404 196 "http://referer.example.com/\"example/" "Useragent\"\"test""#;
    let event = NginxCombinedParser.parse(line).unwrap();

    assert_eq!(event.url, r#"/aaaaa\"\"\""#);
    assert_eq!(event.user_agent, r#"Useragent\"\"test"#);
}

#[test]
fn test_dash_size_is_zero() {
    let line = br#"10.0.0.1 - - [10/Sep/2024:21:18:44 +0000] "HEAD / HTTP/1.1" 304 - "-" "-""#;
    assert_eq!(NginxCombinedParser.parse(line).unwrap().size, 0);
}

#[test]
fn test_bad_size() {
    let line = br#"10.0.0.1 - - [10/Sep/2024:21:18:44 +0000] "GET / HTTP/1.1" 200 12x "-" "-""#;
    assert!(matches!(
        NginxCombinedParser.parse(line).unwrap_err(),
        ParseError::Size(s) if s == "12x"
    ));
}

#[test]
fn test_truncated_line() {
    let line = br#"10.0.0.1 - - [10/Sep/2024:21:18:44 +0000] "GET / HTTP/1.1"#;
    assert!(matches!(
        NginxCombinedParser.parse(line).unwrap_err(),
        ParseError::Format(_)
    ));
}
