//! The request-culture resolution pipeline.
//!
//! Providers run once each, in configured order; the first provider whose
//! candidates survive allowlist validation wins. Rejections are reported as
//! warning events and never abort the pipeline.

use std::sync::Arc;

use crate::culture::{Culture, RequestCulture};
use crate::providers::{
    AcceptLanguageHeaderRequestCultureProvider, CookieRequestCultureProvider,
    QueryStringRequestCultureProvider, RequestCultureProvider,
};
use crate::request::RequestContext;

/// Configuration for the resolution pipeline.
///
/// Built once at startup and treated as immutable afterwards; the provider
/// list can only be shaped through the consuming `with_*` methods, so
/// "insert with priority" happens at construction time, never at request
/// time.
///
/// An empty supported-culture list means "accept any resolvable culture".
pub struct RequestLocalizationOptions {
    /// The culture pair used when no provider produces an accepted match.
    pub default_request_culture: RequestCulture,
    /// Allowlist for the formatting culture; empty accepts any.
    pub supported_cultures: Vec<Culture>,
    /// Allowlist for the UI culture; empty accepts any.
    pub supported_ui_cultures: Vec<Culture>,
    /// Whether a candidate absent from the allowlist may match through its
    /// ancestor chain ("fr-FR" matching a supported "fr").
    pub fall_back_to_parent_cultures: bool,
    /// Same as [`fall_back_to_parent_cultures`], for the UI axis.
    ///
    /// [`fall_back_to_parent_cultures`]: RequestLocalizationOptions::fall_back_to_parent_cultures
    pub fall_back_to_parent_ui_cultures: bool,
    providers: Vec<Arc<dyn RequestCultureProvider>>,
}

impl Default for RequestLocalizationOptions {
    fn default() -> Self {
        RequestLocalizationOptions {
            default_request_culture: RequestCulture::new(Culture::invariant()),
            supported_cultures: Vec::new(),
            supported_ui_cultures: Vec::new(),
            fall_back_to_parent_cultures: true,
            fall_back_to_parent_ui_cultures: true,
            providers: vec![
                Arc::new(QueryStringRequestCultureProvider::new()),
                Arc::new(CookieRequestCultureProvider::new()),
                Arc::new(AcceptLanguageHeaderRequestCultureProvider::new()),
            ],
        }
    }
}

impl RequestLocalizationOptions {
    /// Creates options with the default provider order
    /// `[QueryString, Cookie, AcceptLanguage]` and an invariant default
    /// request culture.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_request_culture(mut self, request_culture: RequestCulture) -> Self {
        self.default_request_culture = request_culture;
        self
    }

    pub fn with_supported_cultures(mut self, cultures: Vec<Culture>) -> Self {
        self.supported_cultures = cultures;
        self
    }

    pub fn with_supported_ui_cultures(mut self, cultures: Vec<Culture>) -> Self {
        self.supported_ui_cultures = cultures;
        self
    }

    pub fn with_fall_back_to_parent_cultures(mut self, fall_back: bool) -> Self {
        self.fall_back_to_parent_cultures = fall_back;
        self.fall_back_to_parent_ui_cultures = fall_back;
        self
    }

    /// Removes all configured providers, so the list can be rebuilt in an
    /// exact order.
    pub fn without_providers(mut self) -> Self {
        self.providers.clear();
        self
    }

    /// Appends a provider at the end of the list (lowest priority).
    pub fn with_provider<P: RequestCultureProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Prepends a provider at priority position 0.
    pub fn with_provider_first<P: RequestCultureProvider + 'static>(
        mut self,
        provider: P,
    ) -> Self {
        self.providers.insert(0, Arc::new(provider));
        self
    }

    /// The configured providers in invocation order.
    pub fn providers(&self) -> &[Arc<dyn RequestCultureProvider>] {
        &self.providers
    }
}

/// The pipeline's output: the winning culture pair plus the name of the
/// provider that produced it (`None` when the default was used).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequestCulture {
    pub request_culture: RequestCulture,
    pub provider: Option<&'static str>,
}

/// Resolves the request culture by running each provider in order.
///
/// Providers are awaited strictly in sequence; the first provider with at
/// least one accepted candidate on either axis wins, and the unmatched axis
/// (if any) takes the configured default's corresponding half. When no
/// provider produces an accepted match, the configured default wins.
///
/// # Example
/// ```rust,no_run
/// use polocale::{
///     Culture, RequestContext, RequestCulture, RequestLocalizationOptions,
///     resolve_request_culture,
/// };
///
/// # async fn run() -> Result<(), polocale::Error> {
/// let options = RequestLocalizationOptions::new()
///     .with_default_request_culture(RequestCulture::from_names("en-US", "en-US")?)
///     .with_supported_cultures(vec![Culture::parse("en-US")?, Culture::parse("ar-SA")?]);
///
/// let context = RequestContext::new().with_query("culture", "ar-SA");
/// let resolved = resolve_request_culture(&options, &context).await;
/// assert_eq!(resolved.request_culture.culture().name(), "ar-SA");
/// # Ok(())
/// # }
/// ```
pub async fn resolve_request_culture(
    options: &RequestLocalizationOptions,
    context: &RequestContext,
) -> ResolvedRequestCulture {
    for provider in options.providers() {
        let Some(result) = provider.determine_provider_culture(context).await else {
            continue;
        };
        if result.is_empty() {
            continue;
        }

        // A result carrying only one list feeds both axes, mirroring the
        // query-string symmetry rule.
        let culture_candidates = if result.cultures.is_empty() {
            &result.ui_cultures
        } else {
            &result.cultures
        };
        let ui_candidates = if result.ui_cultures.is_empty() {
            &result.cultures
        } else {
            &result.ui_cultures
        };

        let culture = best_match(
            culture_candidates,
            &options.supported_cultures,
            options.fall_back_to_parent_cultures,
        );
        let ui_culture = best_match(
            ui_candidates,
            &options.supported_ui_cultures,
            options.fall_back_to_parent_ui_cultures,
        );

        if culture.is_none() {
            tracing::warn!(
                provider = provider.name(),
                cultures = %culture_candidates.join(", "),
                "provider returned unsupported cultures",
            );
        }
        if ui_culture.is_none() {
            tracing::warn!(
                provider = provider.name(),
                ui_cultures = %ui_candidates.join(", "),
                "provider returned unsupported UI cultures",
            );
        }
        if culture.is_none() && ui_culture.is_none() {
            continue;
        }

        let request_culture = RequestCulture::with_ui_culture(
            culture.unwrap_or_else(|| options.default_request_culture.culture().clone()),
            ui_culture.unwrap_or_else(|| options.default_request_culture.ui_culture().clone()),
        );

        return ResolvedRequestCulture {
            request_culture,
            provider: Some(provider.name()),
        };
    }

    ResolvedRequestCulture {
        request_culture: options.default_request_culture.clone(),
        provider: None,
    }
}

/// Picks the first candidate, in preference order, that resolves to a
/// culture and passes the allowlist (an empty allowlist accepts any
/// resolvable candidate). With parent fallback enabled, a candidate may
/// also match the allowlist through a non-invariant ancestor.
fn best_match(
    candidates: &[String],
    allowlist: &[Culture],
    fall_back_to_parents: bool,
) -> Option<Culture> {
    for name in candidates {
        let Ok(culture) = Culture::parse(name) else {
            continue;
        };

        if allowlist.is_empty() || allowlist.contains(&culture) {
            return Some(culture);
        }

        if fall_back_to_parents {
            for ancestor in culture.ancestors().skip(1) {
                if ancestor.is_invariant() {
                    break;
                }
                if allowlist.contains(&ancestor) {
                    return Some(ancestor);
                }
            }
        }
    }

    None
}
