//! Run-scoped API credentials.
//!
//! Credentials are supplied by the user for one run and passed explicitly into
//! every port call. They are never serialised, never written to disk, and
//! their `Debug` output is redacted so they cannot leak through `tracing`.

/// An opaque, non-empty API key.
///
/// Deliberately implements neither `Display` nor `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates an [`ApiKey`], returning `None` if `value` is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Exposes the secret for use in an outgoing request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// The two credentials a run needs.
///
/// An absent key is `None`; adapters report
/// [`MissingCredential`](crate::ResearchError::MissingCredential) when the key
/// they need is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    research: Option<ApiKey>,
    generation: Option<ApiKey>,
}

impl Credentials {
    /// Builds credentials from raw user input; blank strings count as absent.
    pub fn from_raw(research: impl Into<String>, generation: impl Into<String>) -> Self {
        Self {
            research: ApiKey::new(research),
            generation: ApiKey::new(generation),
        }
    }

    /// Builds credentials from already-validated keys.
    pub fn new(research: Option<ApiKey>, generation: Option<ApiKey>) -> Self {
        Self {
            research,
            generation,
        }
    }

    /// Key for the web-research API.
    pub fn research(&self) -> Option<&ApiKey> {
        self.research.as_ref()
    }

    /// Key for the text-generation API.
    pub fn generation(&self) -> Option<&ApiKey> {
        self.generation.as_ref()
    }

    /// Returns `true` when both keys are present.
    pub fn is_complete(&self) -> bool {
        self.research.is_some() && self.generation.is_some()
    }
}
