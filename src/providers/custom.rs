//! A provider wrapping an arbitrary user-supplied async function.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::providers::{ProviderCultureResult, RequestCultureProvider};
use crate::request::RequestContext;

/// The boxed future a custom provider function returns.
pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Option<ProviderCultureResult>> + Send + 'a>>;

/// Wraps a user-supplied async function with the provider signature.
///
/// Used to compose app-specific signals (e.g. an authenticated user's
/// stored preference); typically prepended to the provider list so it runs
/// at priority position 0.
///
/// # Example
/// ```rust
/// use polocale::{
///     CustomRequestCultureProvider, ProviderCultureResult, RequestContext,
/// };
/// use polocale::providers::custom::ProviderFuture;
///
/// fn user_preference(_context: &RequestContext) -> ProviderFuture<'_> {
///     Box::pin(async { Some(ProviderCultureResult::single("ar-SA")) })
/// }
///
/// let provider = CustomRequestCultureProvider::new(user_preference);
/// ```
pub struct CustomRequestCultureProvider {
    name: &'static str,
    provider: Box<dyn for<'a> Fn(&'a RequestContext) -> ProviderFuture<'a> + Send + Sync>,
}

impl CustomRequestCultureProvider {
    pub fn new<F>(provider: F) -> Self
    where
        F: for<'a> Fn(&'a RequestContext) -> ProviderFuture<'a> + Send + Sync + 'static,
    {
        Self::named("CustomRequestCultureProvider", provider)
    }

    /// Creates a custom provider with a distinct name for observability.
    pub fn named<F>(name: &'static str, provider: F) -> Self
    where
        F: for<'a> Fn(&'a RequestContext) -> ProviderFuture<'a> + Send + Sync + 'static,
    {
        CustomRequestCultureProvider {
            name,
            provider: Box::new(provider),
        }
    }
}

impl std::fmt::Debug for CustomRequestCultureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRequestCultureProvider")
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl RequestCultureProvider for CustomRequestCultureProvider {
    async fn determine_provider_culture(
        &self,
        context: &RequestContext,
    ) -> Option<ProviderCultureResult> {
        (self.provider)(context).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
