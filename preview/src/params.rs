//! Loosely typed request parameters.
//!
//! Values may arrive as JSON numbers, booleans or strings (the CLI only
//! produces strings), so every accessor accepts the string form too.

use dysnomia_types::Address;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PreviewError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` pairs. A bare `key` is read as `key=true`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, PreviewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Map::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').unwrap_or((pair, "true"));
            let key = key.trim();
            if key.is_empty() {
                return Err(PreviewError::invalid(pair, "empty parameter name"));
            }
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(Self(map))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn u64(&self, key: &str) -> Result<u64, PreviewError> {
        let value = self
            .get(key)
            .ok_or_else(|| PreviewError::MissingParam(key.to_string()))?;
        let wide = to_uint(key, value)?;
        u64::try_from(wide).map_err(|_| PreviewError::invalid(key, "does not fit in 64 bits"))
    }

    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64, PreviewError> {
        if self.contains(key) {
            self.u64(key)
        } else {
            Ok(default)
        }
    }

    pub fn uint(&self, key: &str) -> Result<BigUint, PreviewError> {
        let value = self
            .get(key)
            .ok_or_else(|| PreviewError::MissingParam(key.to_string()))?;
        to_uint(key, value)
    }

    pub fn uint_or_zero(&self, key: &str) -> Result<BigUint, PreviewError> {
        if self.contains(key) {
            self.uint(key)
        } else {
            Ok(BigUint::default())
        }
    }

    /// Missing flags are false.
    pub fn flag(&self, key: &str) -> Result<bool, PreviewError> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                _ => Err(PreviewError::invalid(key, format!("not a boolean: {s:?}"))),
            },
            Some(other) => Err(PreviewError::invalid(key, format!("not a boolean: {other}"))),
        }
    }

    pub fn address(&self, key: &str) -> Result<Address, PreviewError> {
        match self.get(key) {
            None => Err(PreviewError::MissingParam(key.to_string())),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|e| PreviewError::invalid(key, format!("{e}"))),
            Some(other) => Err(PreviewError::invalid(key, format!("not an address: {other}"))),
        }
    }

    pub fn optional_address(&self, key: &str) -> Result<Option<Address>, PreviewError> {
        if self.contains(key) {
            self.address(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// String form of a parameter; missing reads as empty.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

fn to_uint(key: &str, value: &Value) -> Result<BigUint, PreviewError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(BigUint::from)
            .ok_or_else(|| PreviewError::invalid(key, format!("not an unsigned integer: {n}"))),
        Value::String(s) => parse_uint(s).ok_or_else(|| {
            PreviewError::invalid(key, format!("not an unsigned integer: {s:?}"))
        }),
        other => Err(PreviewError::invalid(
            key,
            format!("not an unsigned integer: {other}"),
        )),
    }
}

/// Decimal, or hex with a `0x` prefix.
fn parse_uint(raw: &str) -> Option<BigUint> {
    let raw = raw.trim();
    let (digits, radix) = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (raw, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
}
