use crate::event::LogEvent;
use crate::parser::{ParseError, Parser, local_time, parse_size};

const LOG_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const LISTING_URL: &str = "/";

/// rsync-proxy's `access.log`. Each transfer is logged when it starts and
/// again when it finishes; only the latter carries a size.
///
/// ```text
/// 2024/10/01 00:00:00 server.go:279: client 10.0.0.1 starts requesting module ubuntu
/// 2024/10/01 00:00:00 server.go:279: client 10.0.0.1 finishes module ubuntu (sent: 1841, received: 208)
/// 2024/10/01 00:00:00 server.go:279: client 10.0.0.1:2333 requests listing all modules
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RsyncProxyParser;

/// `[v6]:port` or `v4:port` without the port.
fn strip_port(client: &str) -> &str {
    match client.strip_prefix('[') {
        Some(bracketed) => bracketed.split(']').next().unwrap_or(bracketed),
        None => client.split(':').next().unwrap_or(client),
    }
}

impl Parser for RsyncProxyParser {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError> {
        let line = String::from_utf8_lossy(line);
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 9 && fields.len() != 12 {
            return Err(ParseError::FieldCount {
                expected: "9 or 12",
                got: fields.len(),
            });
        }

        let time = local_time(&format!("{} {}", fields[0], fields[1]), LOG_TIME_FORMAT)?;
        let mut event = LogEvent {
            client: fields[4].to_string(),
            time,
            ..LogEvent::default()
        };

        match fields[5] {
            "starts" => {
                return Ok(LogEvent {
                    discard: true,
                    ..LogEvent::default()
                });
            }
            "finishes" => {
                event.url = fields[7].to_string();
                event.size = parse_size(fields[9].trim_end_matches(',').as_bytes())?;
            }
            "requests" if fields[6] == "listing" => {
                event.url = LISTING_URL.to_string();
                event.client = strip_port(fields[4]).to_string();
            }
            // requests non-existing module <name>
            "requests" => event.url = fields[8].to_string(),
            _ => {}
        }
        Ok(event)
    }
}
