use crate::event::LogEvent;
use crate::parser::clf::{find_closing_quote, request_path};
use crate::parser::{InitError, ParseError, Parser, local_time, parse_size};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable naming the GoAccess configuration file.
pub const GOACCESS_CONFIG_ENV: &str = "GOACCESS_CONFIG";

const CLF_DATE: &str = "%d/%b/%Y";
const CLF_TIME: &str = "%H:%M:%S";

/// `(log-format, date-format, time-format)` for GoAccess's named formats.
fn predefined(name: &str) -> Option<(&'static str, &'static str, &'static str)> {
    let format = match name {
        "COMBINED" => (
            r#"%h %^[%d:%t %^] "%r" %s %b "%R" "%u""#,
            CLF_DATE,
            CLF_TIME,
        ),
        "VCOMBINED" => (
            r#"%v:%^ %h %^[%d:%t %^] "%r" %s %b "%R" "%u""#,
            CLF_DATE,
            CLF_TIME,
        ),
        "COMMON" => (r#"%h %^[%d:%t %^] "%r" %s %b"#, CLF_DATE, CLF_TIME),
        "VCOMMON" => (r#"%v:%^ %h %^[%d:%t %^] "%r" %s %b"#, CLF_DATE, CLF_TIME),
        "CADDY" => (
            r#"{"ts":"%x.%^","request":{"client_ip":"%h","proto":"%H","method":"%m","host":"%v","uri":"%U","headers":{"User-Agent":["%u"],"Referer":["%R"]}},"duration":"%T","size":"%b","status":"%s","resp_headers":{"Content-Type":["%M"]}}"#,
            "%s",
            "%s",
        ),
        _ => return None,
    };
    Some(format)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Spec(char),
    SkipSpaces,
}

fn tokenize(format: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.next() {
            Some('%') | None => literal.push('%'),
            Some(spec) => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(match spec {
                    '~' => Token::SkipSpaces,
                    spec => Token::Spec(spec),
                });
            }
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSeg {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone)]
enum Template {
    Text(Vec<Token>),
    /// One text template per string leaf of the JSON log-format.
    Json(Vec<(Vec<PathSeg>, Vec<Token>)>),
}

impl Template {
    fn compile(log_format: &str) -> Result<Self, InitError> {
        if !log_format.trim_start().starts_with('{') {
            return Ok(Self::Text(tokenize(log_format)));
        }

        let value: Value = serde_json::from_str(log_format)?;
        if !value.is_object() {
            return Err(InitError::NotAnObject);
        }
        let mut leaves = Vec::new();
        collect_leaves(&value, &mut Vec::new(), &mut leaves);
        Ok(Self::Json(leaves))
    }
}

fn collect_leaves(
    value: &Value,
    path: &mut Vec<PathSeg>,
    out: &mut Vec<(Vec<PathSeg>, Vec<Token>)>,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(PathSeg::Key(key.clone()));
                collect_leaves(child, path, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                path.push(PathSeg::Index(i));
                collect_leaves(child, path, out);
                path.pop();
            }
        }
        Value::String(format) => out.push((path.clone(), tokenize(format))),
        _ => {}
    }
}

fn lookup<'a>(value: &'a Value, path: &[PathSeg]) -> Option<&'a Value> {
    path.iter().try_fold(value, |value, seg| match seg {
        PathSeg::Key(key) => value.get(key.as_str()),
        PathSeg::Index(i) => value.get(*i),
    })
}

/// Fields captured from one line before they are turned into a [`LogEvent`].
#[derive(Debug, Default)]
struct Captured {
    client: String,
    date: Option<String>,
    time: Option<String>,
    datetime: Option<String>,
    server: String,
    size: u64,
    request: Option<String>,
    path: String,
    query: String,
    user_agent: String,
}

impl Captured {
    fn set(&mut self, spec: char, value: &str) -> Result<(), ParseError> {
        match spec {
            'h' => self.client = value.to_string(),
            'd' => self.date = Some(value.to_string()),
            't' => self.time = Some(value.to_string()),
            'x' => self.datetime = Some(value.to_string()),
            'v' => self.server = value.to_string(),
            'b' => {
                self.size = match value {
                    "" | "-" => 0,
                    raw => parse_size(raw.as_bytes())?,
                }
            }
            'r' => self.request = Some(value.to_string()),
            'U' => self.path = value.to_string(),
            'q' => self.query = value.to_string(),
            'u' => self.user_agent = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    fn url(&self) -> String {
        if let Some(request) = &self.request {
            return String::from_utf8_lossy(request_path(request.as_bytes())).into_owned();
        }
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

const MISMATCH: ParseError = ParseError::Format("line does not match log-format");

/// Byte length of the field in `rest` that ends where `next` begins.
fn field_end(rest: &str, next: &str) -> Result<usize, ParseError> {
    if next.starts_with('"') {
        return find_closing_quote(rest.as_bytes()).ok_or(MISMATCH);
    }
    rest.find(next).ok_or(MISMATCH)
}

fn apply(tokens: &[Token], input: &str, out: &mut Captured) -> Result<(), ParseError> {
    let mut rest = input;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(literal) => {
                rest = rest.strip_prefix(literal.as_str()).ok_or(MISMATCH)?;
            }
            Token::SkipSpaces => rest = rest.trim_start(),
            Token::Spec(spec) => {
                let end = match tokens.get(i + 1) {
                    Some(Token::Literal(next)) => field_end(rest, next)?,
                    Some(_) => rest.find(' ').unwrap_or(rest.len()),
                    None => rest.len(),
                };
                let (value, tail) = rest.split_at(end);
                out.set(*spec, value)?;
                rest = tail;
            }
        }
    }
    Ok(())
}

fn parse_time(raw: &str, format: &str) -> Result<DateTime<Utc>, ParseError> {
    if format == "%s" {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| ParseError::Timestamp(raw.to_string()));
    }
    if format.contains("%z") {
        return DateTime::parse_from_str(raw, format)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| ParseError::Timestamp(raw.to_string()));
    }
    local_time(raw, format)
}

/// Any format GoAccess can describe with `log-format`, `date-format` and
/// `time-format`, read from a GoAccess configuration file.
///
/// Both plain-text and JSON log formats are understood. Captured specifiers
/// are `%h %d %t %x %v %b %r %U %q %u`; the rest are matched and dropped.
/// Times without a zone are taken as local.
#[derive(Debug, Clone)]
pub struct GoAccessParser {
    template: Template,
    date_format: String,
    time_format: String,
    datetime_format: String,
}

impl GoAccessParser {
    /// Loads the file named by `GOACCESS_CONFIG`.
    pub fn from_env() -> Result<Self, InitError> {
        let path = std::env::var_os(GOACCESS_CONFIG_ENV)
            .ok_or(InitError::MissingEnv(GOACCESS_CONFIG_ENV))?;
        Self::from_config_file(Path::new(&path))
    }

    pub fn from_config_file(path: &Path) -> Result<Self, InitError> {
        let config = fs::read_to_string(path).map_err(|source| InitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_config_str(&config)
    }

    /// Reads `key value` lines; `#` starts a comment and unknown keys are
    /// skipped. `log-format` may name one of the predefined formats, which
    /// also supplies default date and time formats.
    pub fn from_config_str(config: &str) -> Result<Self, InitError> {
        let (mut log_format, mut date_format, mut time_format, mut datetime_format) =
            (None, None, None, None);
        for line in config.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let value = Some(value.trim().to_string());
            match key {
                "log-format" => log_format = value,
                "date-format" => date_format = value,
                "time-format" => time_format = value,
                "datetime-format" => datetime_format = value,
                _ => {}
            }
        }

        let log_format = log_format.ok_or(InitError::MissingKey("log-format"))?;
        let (log_format, date_format, time_format) = match predefined(&log_format) {
            Some((format, date, time)) => (
                format.to_string(),
                date_format.unwrap_or_else(|| date.to_string()),
                time_format.unwrap_or_else(|| time.to_string()),
            ),
            None => (
                log_format,
                date_format.ok_or(InitError::MissingKey("date-format"))?,
                time_format.ok_or(InitError::MissingKey("time-format"))?,
            ),
        };
        let datetime_format = datetime_format.unwrap_or_else(|| {
            if date_format == time_format {
                date_format.clone()
            } else {
                format!("{date_format} {time_format}")
            }
        });

        Ok(Self {
            template: Template::compile(&log_format)?,
            date_format,
            time_format,
            datetime_format,
        })
    }

    fn time(&self, captured: &Captured) -> Result<DateTime<Utc>, ParseError> {
        if let Some(datetime) = &captured.datetime {
            return parse_time(datetime, &self.datetime_format);
        }
        let date = captured
            .date
            .as_deref()
            .ok_or(ParseError::Format("no date captured"))?;
        match &captured.time {
            Some(time) if self.date_format != self.time_format => parse_time(
                &format!("{date} {time}"),
                &format!("{} {}", self.date_format, self.time_format),
            ),
            _ => parse_time(date, &self.date_format),
        }
    }
}

impl Parser for GoAccessParser {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError> {
        let mut captured = Captured::default();
        match &self.template {
            Template::Text(tokens) => apply(tokens, &String::from_utf8_lossy(line), &mut captured)?,
            Template::Json(leaves) => {
                let value: Value = serde_json::from_slice(line)?;
                for (path, tokens) in leaves {
                    let text = match lookup(&value, path) {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Number(n)) => n.to_string(),
                        Some(Value::Bool(b)) => b.to_string(),
                        _ => continue,
                    };
                    apply(tokens, &text, &mut captured)?;
                }
            }
        }

        if captured.client.is_empty() {
            return Err(ParseError::Format("no host captured"));
        }

        Ok(LogEvent {
            size: captured.size,
            time: self.time(&captured)?,
            url: captured.url(),
            client: captured.client,
            server: captured.server,
            user_agent: captured.user_agent,
            discard: false,
        })
    }
}
