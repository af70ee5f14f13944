//! Request culture providers.
//!
//! Each provider inspects one request-bound signal and proposes candidate
//! culture names; the resolution pipeline in [`crate::pipeline`] validates
//! the candidates against the configured allowlists.

pub mod accept_language;
pub mod cookie;
pub mod custom;
pub mod query_string;

use async_trait::async_trait;

// Reexporting the providers for easier access
pub use accept_language::AcceptLanguageHeaderRequestCultureProvider;
pub use cookie::CookieRequestCultureProvider;
pub use custom::CustomRequestCultureProvider;
pub use query_string::QueryStringRequestCultureProvider;

use crate::request::RequestContext;

/// Candidate culture names proposed by one provider, most preferred first.
///
/// `cultures` are candidates for the formatting culture, `ui_cultures` for
/// the translation culture. A provider that found a single undifferentiated
/// signal fills both lists with it (see [`ProviderCultureResult::single`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCultureResult {
    pub cultures: Vec<String>,
    pub ui_cultures: Vec<String>,
}

impl ProviderCultureResult {
    pub fn new(cultures: Vec<String>, ui_cultures: Vec<String>) -> Self {
        ProviderCultureResult {
            cultures,
            ui_cultures,
        }
    }

    /// A result with the same single candidate on both axes.
    pub fn single(name: impl Into<String>) -> Self {
        let name = name.into();
        ProviderCultureResult {
            cultures: vec![name.clone()],
            ui_cultures: vec![name],
        }
    }

    /// Whether the result carries no candidate at all.
    pub fn is_empty(&self) -> bool {
        self.cultures.is_empty() && self.ui_cultures.is_empty()
    }
}

/// A request-signal inspector proposing candidate cultures.
///
/// "No signal found" is `None`, never an error. Implementations may suspend
/// (e.g. a custom provider awaiting an external lookup); the pipeline awaits
/// providers strictly in configured order.
#[async_trait]
pub trait RequestCultureProvider: Send + Sync {
    /// Inspects the request and proposes candidate cultures, or `None` when
    /// the provider's signal is absent.
    async fn determine_provider_culture(
        &self,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult>;

    /// The provider name used in observability events.
    fn name(&self) -> &'static str;
}
