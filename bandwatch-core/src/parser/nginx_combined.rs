use crate::event::LogEvent;
use crate::parser::clf::{Fields, parse_clf_time, request_path};
use crate::parser::{ParseError, Parser, lossy, parse_size};

/// nginx's stock `combined` format:
///
/// ```text
/// $remote_addr - $remote_user [$time_local] "$request" $status
///     $body_bytes_sent "$http_referer" "$http_user_agent"
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NginxCombinedParser;


impl Parser for NginxCombinedParser {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError> {
        let mut fields = Fields::new(line);

        let client = fields.word("missing client address")?;
        fields.word("missing identity")?;
        fields.word("missing user")?;
        let time = fields.bracketed("missing [time]")?;
        let request = fields.quoted("missing \"request\"")?;
        fields.word("missing status")?;
        let size = fields.word("missing body size")?;
        fields.quoted("missing \"referer\"")?;
        let user_agent = fields.quoted("missing \"user-agent\"")?;

        let size = match size {
            b"-" => 0,
            raw => parse_size(raw)?,
        };

        Ok(LogEvent {
            size,
            client: lossy(client),
            time: parse_clf_time(&String::from_utf8_lossy(time))?,
            url: lossy(request_path(request)),
            server: String::new(),
            user_agent: lossy(user_agent),
            discard: false,
        })
    }
}
