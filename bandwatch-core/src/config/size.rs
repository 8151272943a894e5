use crate::config::ConfigError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A byte count given on the command line.
///
/// Accepts a plain integer (`1048576`) or a number with a unit. Units follow
/// the usual convention: `k`, `M`, `G`, ... (with or without a trailing `B`)
/// are powers of 1000, while `Ki`, `Mi`, `Gi`, ... (with or without `B`) are
/// powers of 1024. Unit matching is case-insensitive and decimals are allowed,
/// so `1.5GiB`, `100M` and `10 mb` all parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(pub u64);

const SI_UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB"];

impl ByteSize {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Ok(raw) = input.parse::<u64>() {
            return Ok(Self(raw));
        }

        let split = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(input.len());
        let (number, unit) = input.split_at(split);
        if number.is_empty() {
            return Err(ConfigError::invalid_size(s, "missing number"));
        }

        let value: f64 = number
            .parse()
            .map_err(|_| ConfigError::invalid_size(s, "malformed number"))?;
        let multiplier = unit_multiplier(unit.trim())
            .ok_or_else(|| ConfigError::invalid_size(s, "unknown unit"))?;

        let bytes = value * multiplier;
        if !bytes.is_finite() || bytes >= u64::MAX as f64 {
            return Err(ConfigError::invalid_size(s, "too large"));
        }

        Ok(Self(bytes as u64))
    }
}

fn unit_multiplier(unit: &str) -> Option<f64> {
    let unit = unit.to_ascii_lowercase();
    let unit = unit.strip_suffix('b').unwrap_or(&unit);

    let (prefix, binary) = match unit.strip_suffix('i') {
        Some(prefix) => (prefix, true),
        None => (unit, false),
    };

    let exponent = match prefix {
        "" if !binary => 0,
        "k" => 1,
        "m" => 2,
        "g" => 3,
        "t" => 4,
        "p" => 5,
        "e" => 6,
        _ => return None,
    };

    let base: f64 = if binary { 1024.0 } else { 1000.0 };
    Some(base.powi(exponent))
}

/// SI rendering, e.g. `10 MB`.
impl Display for ByteSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 < 10 {
            return write!(f, "{} B", self.0);
        }

        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1000.0 && unit < SI_UNITS.len() - 1 {
            value /= 1000.0;
            unit += 1;
        }

        let rounded = (value * 10.0).round() / 10.0;
        if rounded < 10.0 {
            write!(f, "{:.1} {}", rounded, SI_UNITS[unit])
        } else {
            write!(f, "{:.0} {}", rounded, SI_UNITS[unit])
        }
    }
}
