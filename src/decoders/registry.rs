//! Registry of external codecs.
//!
//! Maps each non-built-in [`FilterIdentifier`] to the codec that serves it.
//! A registry is assembled through [`CodecRegistryBuilder`] and is immutable
//! afterwards, so one instance can be shared freely between threads.

use crate::decoders::ccitt::CcittFaxCodec;
use crate::decoders::codec::ExternalCodec;
use crate::decoders::crypt::IdentityCryptCodec;
use crate::decoders::dct::DctCodec;
use crate::decoders::filter::FilterIdentifier;
use crate::decoders::stub::UnimplementedCodec;
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    /// Process-wide registry holding the default codecs.
    static ref DEFAULT_REGISTRY: CodecRegistry = CodecRegistry::with_default_codecs();
}

/// The default registry used by [`decode`](crate::decoders::decode).
pub fn registry() -> &'static CodecRegistry {
    &DEFAULT_REGISTRY
}

/// Immutable map from filter identifier to external codec.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<FilterIdentifier, Arc<dyn ExternalCodec>>,
}

impl CodecRegistry {
    /// A registry with no codecs: every external filter is `NotImplemented`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// CCITTFax, DCT and Identity crypt decoders, plus placeholders for
    /// JBIG2 and JPX.
    pub fn with_default_codecs() -> Self {
        let mut codecs: HashMap<FilterIdentifier, Arc<dyn ExternalCodec>> = HashMap::new();
        codecs.insert(FilterIdentifier::CCITTFax, Arc::new(CcittFaxCodec));
        codecs.insert(FilterIdentifier::DCT, Arc::new(DctCodec));
        codecs.insert(FilterIdentifier::Crypt, Arc::new(IdentityCryptCodec));
        codecs.insert(FilterIdentifier::JBIG2, Arc::new(UnimplementedCodec::new(FilterIdentifier::JBIG2)));
        codecs.insert(FilterIdentifier::JPX, Arc::new(UnimplementedCodec::new(FilterIdentifier::JPX)));
        Self { codecs }
    }

    /// Empty builder.
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// Look up the codec registered for `filter`.
    pub fn get(&self, filter: FilterIdentifier) -> Option<&dyn ExternalCodec> {
        self.codecs.get(&filter).map(|codec| codec.as_ref())
    }

    /// True if a codec is registered for `filter`.
    pub fn contains(&self, filter: FilterIdentifier) -> bool {
        self.codecs.contains_key(&filter)
    }

    /// Registered filters, sorted.
    pub fn filters(&self) -> Vec<FilterIdentifier> {
        let mut filters: Vec<_> = self.codecs.keys().copied().collect();
        filters.sort();
        filters
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("filters", &self.filters())
            .finish()
    }
}

/// Builder for [`CodecRegistry`].
///
/// # Example
///
/// ```
/// use pdf_filters::decoders::{CodecRegistry, FilterIdentifier, UnimplementedCodec};
///
/// let registry = CodecRegistry::builder()
///     .register(UnimplementedCodec::new(FilterIdentifier::JPX))
///     .unwrap()
///     .build();
/// assert!(registry.contains(FilterIdentifier::JPX));
/// assert!(!registry.contains(FilterIdentifier::DCT));
/// ```
#[derive(Default)]
pub struct CodecRegistryBuilder {
    codecs: HashMap<FilterIdentifier, Arc<dyn ExternalCodec>>,
}

impl CodecRegistryBuilder {
    /// Start from the default codecs.
    pub fn with_defaults() -> Self {
        Self {
            codecs: CodecRegistry::with_default_codecs().codecs,
        }
    }

    /// Register a codec for a filter that has none yet.
    pub fn register(self, codec: impl ExternalCodec + 'static) -> Result<Self> {
        let filter = codec.filter();
        if self.codecs.contains_key(&filter) {
            return Err(Error::Registration(format!("{} already has a codec", filter)));
        }
        self.replace(codec)
    }

    /// Register a codec, overriding any existing registration.
    pub fn replace(mut self, codec: impl ExternalCodec + 'static) -> Result<Self> {
        let filter = codec.filter();
        if filter.is_builtin() {
            return Err(Error::Registration(format!(
                "{} is built in and cannot be served by an external codec",
                filter
            )));
        }
        log::debug!("Registering codec {} for {}", codec.name(), filter);
        self.codecs.insert(filter, Arc::new(codec));
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> CodecRegistry {
        CodecRegistry { codecs: self.codecs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeOptions;
    use crate::decoders::params::DecodeParams;

    struct ReverseCodec(FilterIdentifier);

    impl ExternalCodec for ReverseCodec {
        fn filter(&self) -> FilterIdentifier {
            self.0
        }

        fn decode(&self, input: &[u8], _: &DecodeParams, _: &DecodeOptions) -> Result<Vec<u8>> {
            Ok(input.iter().rev().copied().collect())
        }
    }

    #[test]
    fn test_default_registry_covers_external_filters() {
        let reg = registry();
        for filter in FilterIdentifier::ALL {
            assert_eq!(reg.contains(filter), !filter.is_builtin(), "{}", filter);
        }
        assert_eq!(reg.get(FilterIdentifier::DCT).map(|c| c.name()), Some("DCTDecode"));
    }

    #[test]
    fn test_register_rejects_builtin() {
        let result = CodecRegistry::builder().register(ReverseCodec(FilterIdentifier::Flate));
        assert!(matches!(result, Err(Error::Registration(_))));
        let result = CodecRegistryBuilder::with_defaults().replace(ReverseCodec(FilterIdentifier::LZW));
        assert!(matches!(result, Err(Error::Registration(_))));
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let result = CodecRegistryBuilder::with_defaults().register(ReverseCodec(FilterIdentifier::JPX));
        assert!(matches!(result, Err(Error::Registration(_))));
    }

    #[test]
    fn test_replace_overrides_default() {
        let reg = CodecRegistryBuilder::with_defaults()
            .replace(ReverseCodec(FilterIdentifier::JBIG2))
            .unwrap()
            .build();
        let codec = reg.get(FilterIdentifier::JBIG2).unwrap();
        let output = codec
            .decode(b"abc", &DecodeParams::new(), &DecodeOptions::default())
            .unwrap();
        assert_eq!(output, b"cba");
    }

    #[test]
    fn test_empty_registry() {
        let reg = CodecRegistry::empty();
        assert!(reg.filters().is_empty());
        assert!(reg.get(FilterIdentifier::DCT).is_none());
    }
}
