//! Locale resolution for recognizer configuration.
//!
//! A [`LocaleId`] is the concrete identifier the native engine expects:
//! a language code, optionally qualified by a region. Resolution happens
//! two ways: parsing a caller-supplied tag, or reading the ambient
//! environment through an [`AmbientLocaleProvider`].

use std::fmt;

/// Language (optionally plus region) tag used to configure the native
/// recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleId {
    language: String,
    region: Option<String>,
}

impl LocaleId {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: None,
        }
    }

    pub fn with_region(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: Some(region.into()),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

/// Split `tag` on `_` and build a locale identifier from the first two
/// parts (language, region); a single part is a language-only identifier.
///
/// No validation against a known-locale table happens here. Malformed
/// tags silently produce a possibly invalid identifier, which the native
/// engine is free to reject on its own terms.
pub fn parse_locale_tag(tag: &str) -> LocaleId {
    let mut parts = tag.split('_');
    let language = parts.next().unwrap_or_default();
    match parts.next() {
        Some(region) => LocaleId::with_region(language, region),
        None => LocaleId::new(language),
    }
}

/// External collaborator seam: resolves the environment's current locale.
pub trait AmbientLocaleProvider: Send + Sync {
    /// Best available locale identifier for the running process. Pure
    /// read, no side effects.
    fn ambient_locale(&self) -> LocaleId;
}

/// Reads the process environment. The `LANGUAGE` candidate list takes
/// priority (first entry wins), then the legacy single-value variables
/// `LC_ALL` and `LANG`.
#[derive(Debug, Clone, Default)]
pub struct SystemLocaleProvider;

impl SystemLocaleProvider {
    pub fn new() -> Self {
        Self
    }
}

impl AmbientLocaleProvider for SystemLocaleProvider {
    fn ambient_locale(&self) -> LocaleId {
        if let Ok(list) = std::env::var("LANGUAGE") {
            if let Some(first) = list.split(':').find(|entry| !entry.is_empty()) {
                return parse_locale_tag(strip_posix_suffixes(first));
            }
        }

        for var in ["LC_ALL", "LANG"] {
            if let Ok(value) = std::env::var(var) {
                let value = strip_posix_suffixes(&value);
                if !value.is_empty() && value != "C" && value != "POSIX" {
                    return parse_locale_tag(value);
                }
            }
        }

        tracing::debug!(target: "locale", "no locale in environment, falling back to en_US");
        LocaleId::with_region("en", "US")
    }
}

/// Drop the codeset and modifier decorations of a POSIX locale string
/// ("en_US.UTF-8@euro" -> "en_US").
fn strip_posix_suffixes(value: &str) -> &str {
    let end = value.find(['.', '@']).unwrap_or(value.len());
    &value[..end]
}

/// Constant-locale provider for tests and configuration overrides.
#[derive(Debug, Clone)]
pub struct FixedLocaleProvider {
    locale: LocaleId,
}

impl FixedLocaleProvider {
    pub fn new(locale: LocaleId) -> Self {
        Self { locale }
    }
}

impl AmbientLocaleProvider for FixedLocaleProvider {
    fn ambient_locale(&self) -> LocaleId {
        self.locale.clone()
    }
}
