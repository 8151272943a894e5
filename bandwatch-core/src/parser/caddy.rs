use crate::event::LogEvent;
use crate::parser::{ParseError, Parser, unix_seconds};
use serde::Deserialize;

const HANDLED_REQUEST: &str = "handled request";

/// Caddy's default structured access log.
///
/// Only `handled request` entries are counted; everything else Caddy writes
/// to the same stream is reported as [`ParseError::Ignored`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CaddyJsonParser;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaddyLine {
    msg: String,
    ts: f64,
    request: CaddyRequest,
    size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaddyRequest {
    remote_ip: String,
    client_ip: String,
    uri: String,
    headers: CaddyHeaders,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaddyHeaders {
    #[serde(rename = "User-Agent")]
    user_agent: Vec<String>,
}

impl Parser for CaddyJsonParser {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError> {
        let raw: CaddyLine = serde_json::from_slice(line)?;
        if raw.msg != HANDLED_REQUEST {
            return Err(ParseError::Ignored);
        }

        let CaddyRequest {
            remote_ip,
            client_ip,
            uri,
            headers,
        } = raw.request;

        Ok(LogEvent {
            size: raw.size,
            client: if client_ip.is_empty() {
                remote_ip
            } else {
                client_ip
            },
            time: unix_seconds(raw.ts)?,
            url: uri,
            server: String::new(),
            user_agent: headers.user_agent.join(", "),
            discard: false,
        })
    }
}
