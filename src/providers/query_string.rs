//! Determines the culture for a request via query-string values.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::providers::{ProviderCultureResult, RequestCultureProvider};
use crate::request::RequestContext;

lazy_static! {
    // Syntactic shape of a locale tag; validity against the supported list
    // is the pipeline's job.
    static ref CULTURE_TAG_PATTERN: Regex =
        Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").unwrap();
}

/// Proposes cultures from the request's query string.
///
/// When only one of the two keys is supplied, its value is used for both
/// the culture and the UI culture.
#[derive(Debug, Clone)]
pub struct QueryStringRequestCultureProvider {
    /// The key that contains the culture name. Defaults to `culture`.
    pub query_string_key: String,
    /// The key that contains the UI culture name. Defaults to `ui-culture`.
    pub ui_query_string_key: String,
}

impl Default for QueryStringRequestCultureProvider {
    fn default() -> Self {
        QueryStringRequestCultureProvider {
            query_string_key: "culture".to_string(),
            ui_query_string_key: "ui-culture".to_string(),
        }
    }
}

impl QueryStringRequestCultureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_syntax(&self, value: &str, axis: &str) {
        if !CULTURE_TAG_PATTERN.is_match(value) {
            tracing::warn!(
                provider = self.name(),
                culture = %value,
                "query string contains a syntactically invalid {axis} tag",
            );
        }
    }
}

#[async_trait]
impl RequestCultureProvider for QueryStringRequestCultureProvider {
    async fn determine_provider_culture(
        &self,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        let query_culture = context.query(&self.query_string_key);
        let query_ui_culture = context.query(&self.ui_query_string_key);

        // No values specified for either so no match.
        let (culture, ui_culture) = match (query_culture, query_ui_culture) {
            (None, None) => return None,
            (Some(culture), None) => (culture, culture),
            (None, Some(ui_culture)) => (ui_culture, ui_culture),
            (Some(culture), Some(ui_culture)) => (culture, ui_culture),
        };

        self.check_syntax(culture, "culture");
        if ui_culture != culture {
            self.check_syntax(ui_culture, "UI culture");
        }

        Some(ProviderCultureResult::new(
            vec![culture.to_string()],
            vec![ui_culture.to_string()],
        ))
    }

    fn name(&self) -> &'static str {
        "QueryStringRequestCultureProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn determine(
        provider: &QueryStringRequestCultureProvider,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(provider.determine_provider_culture(context))
    }

    #[test]
    fn test_no_keys_returns_none() {
        let provider = QueryStringRequestCultureProvider::new();
        let context = RequestContext::new().with_query("page", "2");
        assert_eq!(determine(&provider, &context), None);
    }

    #[test]
    fn test_both_keys_present() {
        let provider = QueryStringRequestCultureProvider::new();
        let context = RequestContext::new()
            .with_query("culture", "ar-SA")
            .with_query("ui-culture", "en-US");

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["ar-SA"]);
        assert_eq!(result.ui_cultures, vec!["en-US"]);
    }

    #[test]
    fn test_single_key_used_for_both_axes() {
        let provider = QueryStringRequestCultureProvider::new();

        let context = RequestContext::new().with_query("culture", "fr-FR");
        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["fr-FR"]);
        assert_eq!(result.ui_cultures, vec!["fr-FR"]);

        let context = RequestContext::new().with_query("ui-culture", "fr");
        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["fr"]);
        assert_eq!(result.ui_cultures, vec!["fr"]);
    }

    #[test]
    fn test_invalid_tag_is_still_returned() {
        // Syntactically invalid values are logged, not rejected; the
        // pipeline validates against the supported list.
        let provider = QueryStringRequestCultureProvider::new();
        let context = RequestContext::new().with_query("culture", "??");

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["??"]);
    }

    #[test]
    fn test_custom_key_names() {
        let provider = QueryStringRequestCultureProvider {
            query_string_key: "lang".to_string(),
            ui_query_string_key: "ui-lang".to_string(),
        };
        let context = RequestContext::new().with_query("lang", "de");

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["de"]);
    }
}
