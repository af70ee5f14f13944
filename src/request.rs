//! Request-bound signals inspected by culture providers.
//!
//! Cookie and header parsing primitives live in the HTTP host; a
//! [`RequestContext`] holds the already-parsed values for one request.

use std::collections::HashMap;

/// One `Accept-Language` entry: a locale tag with its quality value, in
/// original header order.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageQuality {
    /// The locale tag. May be empty, which maps to the invariant culture.
    pub value: String,
    /// The quality weight, `1.0` when the header omitted it.
    pub quality: f32,
}

impl LanguageQuality {
    pub fn new(value: impl Into<String>, quality: f32) -> Self {
        LanguageQuality {
            value: value.into(),
            quality,
        }
    }
}

/// The per-request signal set, built once by the HTTP host.
///
/// # Example
/// ```rust
/// use polocale::RequestContext;
///
/// let context = RequestContext::new()
///     .with_query("culture", "fr-FR")
///     .with_cookie("culture", "c=en-US|uic=en-US")
///     .with_accept_language("ar-SA", 0.9);
/// assert_eq!(context.query("culture"), Some("fr-FR"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
    accept_language: Vec<LanguageQuality>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query-string pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds a cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Appends an `Accept-Language` entry; call order is header order.
    pub fn with_accept_language(mut self, value: impl Into<String>, quality: f32) -> Self {
        self.accept_language
            .push(LanguageQuality::new(value, quality));
        self
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// The `Accept-Language` entries in original header order.
    pub fn accept_language(&self) -> &[LanguageQuality] {
        &self.accept_language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let context = RequestContext::new();
        assert_eq!(context.query("culture"), None);
        assert_eq!(context.cookie("culture"), None);
        assert!(context.accept_language().is_empty());
    }

    #[test]
    fn test_builder_accumulates_signals() {
        let context = RequestContext::new()
            .with_query("culture", "ar-SA")
            .with_cookie("prefs", "c=en-US|uic=en-US")
            .with_accept_language("jp", 0.5)
            .with_accept_language("ar-SA", 0.9);

        assert_eq!(context.query("culture"), Some("ar-SA"));
        assert_eq!(context.cookie("prefs"), Some("c=en-US|uic=en-US"));
        assert_eq!(context.accept_language().len(), 2);
        // Header order is preserved.
        assert_eq!(context.accept_language()[0].value, "jp");
        assert_eq!(context.accept_language()[1].quality, 0.9);
    }
}
