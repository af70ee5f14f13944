//! Determines the culture for a request via a preference cookie.

use async_trait::async_trait;

use crate::culture::RequestCulture;
use crate::providers::{ProviderCultureResult, RequestCultureProvider};
use crate::request::RequestContext;

/// Proposes cultures from a named cookie holding a
/// `c={culture}|uic={uiculture}` value.
///
/// The two parts are parsed independently; an absent or malformed part
/// leaves its axis without a candidate.
#[derive(Debug, Clone)]
pub struct CookieRequestCultureProvider {
    /// The cookie that contains the culture value. Defaults to
    /// [`CookieRequestCultureProvider::DEFAULT_COOKIE_NAME`].
    pub cookie_name: String,
}

impl CookieRequestCultureProvider {
    pub const DEFAULT_COOKIE_NAME: &'static str = "culture";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie_name(cookie_name: impl Into<String>) -> Self {
        CookieRequestCultureProvider {
            cookie_name: cookie_name.into(),
        }
    }

    /// Serializes a [`RequestCulture`] into the cookie value format.
    ///
    /// # Example
    /// ```rust
    /// use polocale::{CookieRequestCultureProvider, RequestCulture};
    ///
    /// let request_culture = RequestCulture::from_names("ar-SA", "ar-SA")?;
    /// let value = CookieRequestCultureProvider::make_cookie_value(&request_culture);
    /// assert_eq!(value, "c=ar-SA|uic=ar-SA");
    /// # Ok::<(), polocale::Error>(())
    /// ```
    pub fn make_cookie_value(request_culture: &RequestCulture) -> String {
        format!(
            "c={}|uic={}",
            request_culture.culture().name(),
            request_culture.ui_culture().name()
        )
    }

    /// Parses a cookie value back into candidate culture names.
    ///
    /// Returns `None` when neither part is present.
    pub fn parse_cookie_value(value: &str) -> Option<ProviderCultureResult> {
        let mut culture = None;
        let mut ui_culture = None;

        for part in value.split('|') {
            if let Some(name) = part.strip_prefix("c=") {
                if !name.is_empty() {
                    culture = Some(name.to_string());
                }
            } else if let Some(name) = part.strip_prefix("uic=") {
                if !name.is_empty() {
                    ui_culture = Some(name.to_string());
                }
            }
        }

        if culture.is_none() && ui_culture.is_none() {
            return None;
        }

        Some(ProviderCultureResult::new(
            culture.into_iter().collect(),
            ui_culture.into_iter().collect(),
        ))
    }
}

impl Default for CookieRequestCultureProvider {
    fn default() -> Self {
        CookieRequestCultureProvider {
            cookie_name: Self::DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

#[async_trait]
impl RequestCultureProvider for CookieRequestCultureProvider {
    async fn determine_provider_culture(
        &self,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        let value = context.cookie(&self.cookie_name)?;
        Self::parse_cookie_value(value)
    }

    fn name(&self) -> &'static str {
        "CookieRequestCultureProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::Culture;

    fn determine(
        provider: &CookieRequestCultureProvider,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(provider.determine_provider_culture(context))
    }

    #[test]
    fn test_cookie_value_round_trip() {
        let request_culture = RequestCulture::from_names("ar-SA", "ar-SA").unwrap();
        let value = CookieRequestCultureProvider::make_cookie_value(&request_culture);
        assert_eq!(value, "c=ar-SA|uic=ar-SA");

        let result = CookieRequestCultureProvider::parse_cookie_value(&value).unwrap();
        assert_eq!(result.cultures, vec!["ar-SA"]);
        assert_eq!(result.ui_cultures, vec!["ar-SA"]);
    }

    #[test]
    fn test_cookie_value_round_trip_distinct_halves() {
        let request_culture = RequestCulture::with_ui_culture(
            Culture::parse("en-US").unwrap(),
            Culture::parse("fr-FR").unwrap(),
        );
        let value = CookieRequestCultureProvider::make_cookie_value(&request_culture);
        let result = CookieRequestCultureProvider::parse_cookie_value(&value).unwrap();
        assert_eq!(result.cultures, vec!["en-US"]);
        assert_eq!(result.ui_cultures, vec!["fr-FR"]);
    }

    #[test]
    fn test_partial_cookie_keeps_only_present_axis() {
        let result = CookieRequestCultureProvider::parse_cookie_value("uic=ar-SA").unwrap();
        assert!(result.cultures.is_empty());
        assert_eq!(result.ui_cultures, vec!["ar-SA"]);
    }

    #[test]
    fn test_malformed_cookie_value_is_none() {
        assert_eq!(CookieRequestCultureProvider::parse_cookie_value(""), None);
        assert_eq!(
            CookieRequestCultureProvider::parse_cookie_value("garbage"),
            None
        );
        assert_eq!(
            CookieRequestCultureProvider::parse_cookie_value("c=|uic="),
            None
        );
    }

    #[test]
    fn test_missing_cookie_returns_none() {
        let provider = CookieRequestCultureProvider::new();
        let context = RequestContext::new();
        assert_eq!(determine(&provider, &context), None);
    }

    #[test]
    fn test_named_cookie_is_read() {
        let provider = CookieRequestCultureProvider::with_cookie_name("Preferences");
        let context = RequestContext::new().with_cookie("Preferences", "c=ar-SA|uic=ar-SA");

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["ar-SA"]);
    }
}
