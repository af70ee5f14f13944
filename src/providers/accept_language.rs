//! Determines the culture for a request via the `Accept-Language` header.

use async_trait::async_trait;

use crate::culture::Culture;
use crate::providers::{ProviderCultureResult, RequestCultureProvider};
use crate::request::{LanguageQuality, RequestContext};

/// Proposes a culture from the request's weighted `Accept-Language` entries.
///
/// Only the first [`maximum_header_values_to_try`] entries (in header order)
/// are considered, bounding the cost of repeated culture-resolution
/// attempts. Those entries are then ordered by descending quality; equal
/// qualities keep their original header order. The first tag that resolves
/// to a culture wins. An empty tag value is a legal candidate and resolves
/// to the invariant culture.
///
/// [`maximum_header_values_to_try`]: AcceptLanguageHeaderRequestCultureProvider::maximum_header_values_to_try
#[derive(Debug, Clone)]
pub struct AcceptLanguageHeaderRequestCultureProvider {
    /// The maximum number of header entries to attempt to resolve.
    /// Defaults to `3`; `0` disables the bound.
    pub maximum_header_values_to_try: usize,
}

impl Default for AcceptLanguageHeaderRequestCultureProvider {
    fn default() -> Self {
        AcceptLanguageHeaderRequestCultureProvider {
            maximum_header_values_to_try: 3,
        }
    }
}

impl AcceptLanguageHeaderRequestCultureProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestCultureProvider for AcceptLanguageHeaderRequestCultureProvider {
    async fn determine_provider_culture(
        &self,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        let entries = context.accept_language();
        if entries.is_empty() {
            return None;
        }

        let mut candidates: Vec<&LanguageQuality> =
            if self.maximum_header_values_to_try > 0 {
                entries.iter().take(self.maximum_header_values_to_try).collect()
            } else {
                entries.iter().collect()
            };

        // Stable sort: equal qualities keep their header order.
        candidates.sort_by(|a, b| b.quality.total_cmp(&a.quality));

        for candidate in candidates {
            if Culture::parse(&candidate.value).is_ok() {
                return Some(ProviderCultureResult::single(candidate.value.clone()));
            }
            tracing::debug!(
                provider = self.name(),
                culture = %candidate.value,
                "skipping Accept-Language value that does not resolve to a culture",
            );
        }

        None
    }

    fn name(&self) -> &'static str {
        "AcceptLanguageHeaderRequestCultureProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn determine(
        provider: &AcceptLanguageHeaderRequestCultureProvider,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(provider.determine_provider_culture(context))
    }

    #[test]
    fn test_no_header_returns_none() {
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        assert_eq!(determine(&provider, &RequestContext::new()), None);
    }

    #[test]
    fn test_highest_quality_wins() {
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        let context = RequestContext::new()
            .with_accept_language("fr", 0.5)
            .with_accept_language("ar-SA", 0.9);

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["ar-SA"]);
        assert_eq!(result.ui_cultures, vec!["ar-SA"]);
    }

    #[test]
    fn test_equal_quality_keeps_header_order() {
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        let context = RequestContext::new()
            .with_accept_language("jp", 0.5)
            .with_accept_language("ar-SA", 0.9)
            .with_accept_language("en-US", 0.9);

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["ar-SA"]);
    }

    #[test]
    fn test_truncates_before_ordering() {
        // The fourth entry has the highest quality but is beyond the bound
        // of three, so it is never considered.
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        let context = RequestContext::new()
            .with_accept_language("fr", 0.1)
            .with_accept_language("de", 0.2)
            .with_accept_language("es", 0.3)
            .with_accept_language("en-US", 1.0);

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["es"]);
    }

    #[test]
    fn test_zero_bound_considers_all_entries() {
        let provider = AcceptLanguageHeaderRequestCultureProvider {
            maximum_header_values_to_try: 0,
        };
        let context = RequestContext::new()
            .with_accept_language("fr", 0.1)
            .with_accept_language("de", 0.2)
            .with_accept_language("es", 0.3)
            .with_accept_language("en-US", 1.0);

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["en-US"]);
    }

    #[test]
    fn test_unresolvable_tag_is_skipped() {
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        let context = RequestContext::new()
            .with_accept_language("not a culture", 1.0)
            .with_accept_language("fr", 0.5);

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec!["fr"]);
    }

    #[test]
    fn test_empty_value_resolves_to_invariant() {
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        let context = RequestContext::new().with_accept_language("", 1.0);

        let result = determine(&provider, &context).unwrap();
        assert_eq!(result.cultures, vec![String::new()]);
    }

    #[test]
    fn test_nothing_resolvable_returns_none() {
        let provider = AcceptLanguageHeaderRequestCultureProvider::new();
        let context = RequestContext::new().with_accept_language("not a culture", 1.0);
        assert_eq!(determine(&provider, &context), None);
    }
}
