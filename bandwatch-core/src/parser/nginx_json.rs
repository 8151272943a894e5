use crate::event::LogEvent;
use crate::parser::{ParseError, Parser, unix_seconds};
use serde::Deserialize;

/// The `nginx-json` log format:
///
/// ```text
/// log_format ngx_json escape=json '{"timestamp":$msec,"clientip":"$remote_addr",'
///     '"serverip":"$server_addr","url":"$request_uri","size":$body_bytes_sent,'
///     '"user_agent":"$http_user_agent",...}';
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NginxJsonParser;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NginxJsonLine {
    size: u64,
    #[serde(rename = "clientip")]
    client: String,
    url: String,
    timestamp: f64,
    #[serde(rename = "serverip")]
    server: String,
    user_agent: String,
}

impl Parser for NginxJsonParser {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError> {
        let raw: NginxJsonLine = serde_json::from_slice(line)?;
        Ok(LogEvent {
            size: raw.size,
            client: raw.client,
            time: unix_seconds(raw.timestamp)?,
            url: raw.url,
            server: raw.server,
            user_agent: raw.user_agent,
            discard: false,
        })
    }
}
