use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

fn length_regex() -> &'static Regex {
    static LENGTH_REGEX: OnceLock<Regex> = OnceLock::new();
    LENGTH_REGEX.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)(px|%|em|rem|vw)$").expect("Invalid length regex")
    })
}

/// Units accepted by the max-width control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Px,
    Percent,
    Em,
    Rem,
    Vw,
}

impl LengthUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Percent => "%",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Vw => "vw",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "px" => Some(LengthUnit::Px),
            "%" => Some(LengthUnit::Percent),
            "em" => Some(LengthUnit::Em),
            "rem" => Some(LengthUnit::Rem),
            "vw" => Some(LengthUnit::Vw),
            _ => None,
        }
    }
}

/// A non-negative CSS length such as `320px` or `80%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a CSS length (expected a number followed by px, %, em, rem or vw)")]
pub struct InvalidLength(pub String);

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Interpret raw control input.
    ///
    /// Empty input clears the value. A negative number (`-0` included) is
    /// clamped to zero keeping its unit; input without a unit defaults to
    /// `px`. Any other suffix is rejected.
    pub fn from_control_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let split = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(input.len());
        let (number, suffix) = input.split_at(split);
        let value: f64 = number.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let unit = match suffix.trim() {
            "" => LengthUnit::Px,
            suffix => LengthUnit::from_suffix(suffix)?,
        };
        let value = if value <= 0.0 { 0.0 } else { value };
        Some(Self::new(value, unit))
    }
}

impl FromStr for Length {
    type Err = InvalidLength;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = length_regex()
            .captures(s)
            .ok_or_else(|| InvalidLength(s.to_string()))?;
        let value = captures[1]
            .parse()
            .map_err(|_| InvalidLength(s.to_string()))?;
        let unit = LengthUnit::from_suffix(&captures[2]).ok_or_else(|| InvalidLength(s.to_string()))?;
        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}
