use crate::parser::{CaddyJsonParser, ParseError, Parser};
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;

const LINE: &str = r#"{"level":"info","ts":1646861401.5241024,"logger":"http.log.access","msg":"handled request","request":{"remote_ip":"127.0.0.1","remote_port":"41342","client_ip":"127.0.0.1","proto":"HTTP/2.0","method":"GET","host":"localhost","uri":"/","headers":{"User-Agent":["curl/7.82.0"],"Accept":["*/*"],"Accept-Encoding":["gzip, deflate, br"]},"tls":{"resumed":false,"version":772,"cipher_suite":4865,"proto":"h2","server_name":"example.com"}},"bytes_read": 0,"user_id":"","duration":0.000929675,"size":10900,"status":200,"resp_headers":{"Server":["Caddy"],"Content-Encoding":["gzip"],"Content-Type":["text/html; charset=utf-8"],"Vary":["Accept-Encoding"]}}"#;

#[test]
fn test_parse_handled_request() {
    let event = CaddyJsonParser.parse(LINE.as_bytes()).unwrap();

    assert_eq!(event.url, "/");
    assert_eq!(event.size, 10900);
    assert_eq!(event.client, "127.0.0.1");
    assert_eq!(event.user_agent, "curl/7.82.0");

    let expected = DateTime::<Utc>::from_timestamp(1_646_861_401, 524_102_400).unwrap();
    let drift = (event.time - expected).num_microseconds().unwrap().abs();
    assert!(drift <= 1, "drift {drift}us");
}

#[test]
fn test_other_messages_ignored() {
    let line = r#"{"level":"info","ts":1646861401.5,"msg":"server running"}"#;
    let err = CaddyJsonParser.parse(line.as_bytes()).unwrap_err();
    assert!(err.is_ignored());
}

#[test]
fn test_remote_ip_fallback_and_joined_agents() {
    let line = r#"{"ts":1,"msg":"handled request","size":5,"request":{"remote_ip":"192.0.2.1","uri":"/x","headers":{"User-Agent":["a","b"]}}}"#;
    let event = CaddyJsonParser.parse(line.as_bytes()).unwrap();

    assert_eq!(event.client, "192.0.2.1");
    assert_eq!(event.user_agent, "a, b");
}

#[test]
fn test_malformed_line() {
    assert!(matches!(
        CaddyJsonParser.parse(b"{").unwrap_err(),
        ParseError::Json(_)
    ));
}
