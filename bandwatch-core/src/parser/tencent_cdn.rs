use crate::event::LogEvent;
use crate::parser::clf::split_fields;
use crate::parser::{ParseError, Parser, local_time, lossy, parse_size};

const COMPACT_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Tencent CDN's offline log: sixteen space-separated fields, the user agent
/// and a few others quoted, starting with a compact local timestamp.
///
/// ```text
/// 20240930180135 123.45.67.8 www.example.com /favicon.ico 6969 120 2 200
///     https://www.example.com/ 3 "Mozilla/5.0 ..." "(null)" GET HTTPS hit 32768
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TencentCdnParser;

impl Parser for TencentCdnParser {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError> {
        let fields = split_fields(line)?;
        if fields.len() != 16 {
            return Err(ParseError::FieldCount {
                expected: "16",
                got: fields.len(),
            });
        }

        Ok(LogEvent {
            size: parse_size(fields[4])?,
            client: lossy(fields[1]),
            time: local_time(&String::from_utf8_lossy(fields[0]), COMPACT_TIME_FORMAT)?,
            url: lossy(fields[3]),
            server: lossy(fields[2]),
            user_agent: lossy(fields[10]),
            discard: false,
        })
    }
}
