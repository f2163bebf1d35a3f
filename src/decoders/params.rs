//! Typed access to a filter's `DecodeParms` dictionary.
//!
//! The document model hands over the dictionary as plain name → value pairs.
//! Accessors here apply the per-filter defaults from ISO 32000-1:2008,
//! Tables 8 (LZW/Flate), 11 (CCITTFax) and 14 (Crypt).

use std::collections::HashMap;

/// A single `DecodeParms` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// Name value (without the leading `/`)
    Name(String),
}

impl ParamValue {
    /// Parse a textual value: integers, `true`/`false`, otherwise a name.
    pub fn parse(text: &str) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            return ParamValue::Integer(i);
        }
        match text {
            "true" => ParamValue::Boolean(true),
            "false" => ParamValue::Boolean(false),
            _ => ParamValue::Name(text.trim_start_matches('/').to_string()),
        }
    }

    /// Integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Name payload, if this is a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ParamValue::Name(n) => Some(n),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Name(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Name(value)
    }
}

/// Decode parameters for stream decoders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeParams {
    entries: HashMap<String, ParamValue>,
}

impl DecodeParams {
    /// Empty parameter set (every accessor returns its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// True if no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Integer entry, falling back to `default` when absent or mistyped.
    pub fn integer_or(&self, key: &str, default: i64) -> i64 {
        match self.entries.get(key) {
            Some(ParamValue::Integer(i)) => *i,
            Some(other) => {
                log::debug!("DecodeParms /{} has non-integer value {:?}, using {}", key, other, default);
                default
            },
            None => default,
        }
    }

    /// Boolean entry, falling back to `default` when absent or mistyped.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(ParamValue::Boolean(b)) => *b,
            Some(other) => {
                log::debug!("DecodeParms /{} has non-boolean value {:?}, using {}", key, other, default);
                default
            },
            None => default,
        }
    }

    /// Predictor algorithm (1 = none, 2 = TIFF, 10-15 = PNG). Default 1.
    pub fn predictor(&self) -> i64 {
        self.integer_or("Predictor", 1)
    }

    /// Samples per row. Default 1.
    pub fn columns(&self) -> i64 {
        self.integer_or("Columns", 1)
    }

    /// Interleaved color components per sample. Default 1.
    pub fn colors(&self) -> i64 {
        self.integer_or("Colors", 1)
    }

    /// Bits per color component. Default 8.
    pub fn bits_per_component(&self) -> i64 {
        self.integer_or("BitsPerComponent", 8)
    }

    /// LZW code-width switch offset. Default 1.
    pub fn early_change(&self) -> i64 {
        self.integer_or("EarlyChange", 1)
    }

    /// CCITT encoding scheme (< 0 Group 4, 0 Group 3 1-D, > 0 Group 3 2-D). Default 0.
    pub fn k(&self) -> i64 {
        self.integer_or("K", 0)
    }

    /// CCITT image height; 0 when unknown. Default 0.
    pub fn rows(&self) -> i64 {
        self.integer_or("Rows", 0)
    }

    /// CCITT image width. Default 1728.
    pub fn ccitt_columns(&self) -> i64 {
        self.integer_or("Columns", 1728)
    }

    /// CCITT: 1 bits are black. Default false.
    pub fn black_is_1(&self) -> bool {
        self.bool_or("BlackIs1", false)
    }

    /// CCITT: rows start on byte boundaries. Default false.
    pub fn encoded_byte_align(&self) -> bool {
        self.bool_or("EncodedByteAlign", false)
    }

    /// CCITT: data ends with an end-of-block pattern. Default true.
    pub fn end_of_block(&self) -> bool {
        self.bool_or("EndOfBlock", true)
    }

    /// Crypt filter name. Default `Identity`.
    pub fn crypt_filter_name(&self) -> &str {
        self.entries
            .get("Name")
            .and_then(ParamValue::as_name)
            .unwrap_or("Identity")
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for DecodeParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = DecodeParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
