//! Resource limits for stream decoding.
//!
//! Decompression bombs are a realistic input: a few hundred bytes of Flate or
//! LZW data can expand to gigabytes. Decoders grow their output through a
//! bounded sink and fail with [`Error::ResourceLimitExceeded`] instead of
//! exhausting memory.
//!
//! # Example
//!
//! ```
//! use pdf_filters::config::DecodeOptions;
//!
//! // 100 MB output cap, ratio check disabled (default)
//! let default = DecodeOptions::default();
//!
//! // Untrusted input: also reject anything that expands more than 100:1
//! let hardened = DecodeOptions::hardened();
//!
//! let custom = DecodeOptions::default().with_max_decompressed_size(4 * 1024 * 1024);
//! assert_eq!(custom.max_decompressed_size, 4 * 1024 * 1024);
//! # let _ = (default, hardened);
//! ```
//!
//! [`Error::ResourceLimitExceeded`]: crate::error::Error::ResourceLimitExceeded

use crate::error::{Error, Result};

const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 100 * 1024 * 1024;
const HARDENED_MAX_DECOMPRESSION_RATIO: u32 = 100;

/// Limits applied to every decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum decoded size in bytes.
    ///
    /// Default: 100 MB. Set to 0 to disable the check.
    pub max_decompressed_size: usize,

    /// Maximum decompression ratio (decoded:encoded).
    ///
    /// Legitimate image streams (large blank areas) routinely exceed 100:1,
    /// so this is off by default and enabled by [`DecodeOptions::hardened`].
    /// Set to 0 to disable the check.
    pub max_decompression_ratio: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            max_decompression_ratio: 0,
        }
    }
}

impl DecodeOptions {
    /// Limits for input from untrusted sources.
    pub fn hardened() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            max_decompression_ratio: HARDENED_MAX_DECOMPRESSION_RATIO,
        }
    }

    /// No limits at all.
    pub fn unlimited() -> Self {
        Self {
            max_decompressed_size: 0,
            max_decompression_ratio: 0,
        }
    }

    /// Set the output size cap.
    pub fn with_max_decompressed_size(mut self, bytes: usize) -> Self {
        self.max_decompressed_size = bytes;
        self
    }

    /// Set the ratio cap.
    pub fn with_max_decompression_ratio(mut self, ratio: u32) -> Self {
        self.max_decompression_ratio = ratio;
        self
    }

    /// Output cap as an `Option`, `None` meaning unlimited.
    pub fn output_limit(&self) -> Option<usize> {
        (self.max_decompressed_size > 0).then_some(self.max_decompressed_size)
    }

    /// Check a decoded length against the size cap.
    pub(crate) fn check_size(&self, decoded_len: usize) -> Result<()> {
        match self.output_limit() {
            Some(limit) if decoded_len > limit => Err(Error::ResourceLimitExceeded {
                limit,
                attempted: decoded_len,
            }),
            _ => Ok(()),
        }
    }

    /// Check the expansion of `encoded_len` input bytes into `decoded_len`
    /// output bytes against the ratio cap.
    pub(crate) fn check_ratio(&self, encoded_len: usize, decoded_len: usize) -> Result<()> {
        if self.max_decompression_ratio == 0 || encoded_len == 0 {
            return Ok(());
        }

        let ratio = decoded_len as u64 / encoded_len as u64;
        if ratio > self.max_decompression_ratio as u64 {
            log::warn!(
                "Decompression bomb detected: ratio {}:1 exceeds limit {}:1 (encoded: {} bytes, decoded: {} bytes)",
                ratio,
                self.max_decompression_ratio,
                encoded_len,
                decoded_len
            );
            return Err(Error::ResourceLimitExceeded {
                limit: self.max_decompression_ratio as usize,
                attempted: ratio as usize,
            });
        }
        Ok(())
    }
}
