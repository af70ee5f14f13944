#![forbid(unsafe_code)]
//! Request-culture negotiation and PO translation catalogs for Rust.
//!
//! Resolves which culture (formatting locale) and UI culture (translation
//! locale) apply to an incoming request, then serves translated strings for
//! that culture from gettext-style `.po` files.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use polocale::{Culture, FsPoSource, PoManager, PoStringLocalizer};
//! use std::sync::Arc;
//!
//! let manager = Arc::new(PoManager::new("Messages", "MyApp", FsPoSource::new("resources")));
//! let localizer = PoStringLocalizer::new(manager).with_culture(Culture::parse("fr-FR")?);
//!
//! let greeting = localizer.get("Hello")?;
//! println!("{greeting}");
//! # Ok::<(), polocale::Error>(())
//! ```
//!
//! # Request-culture resolution
//!
//! Per request, an ordered provider chain (query string, cookie,
//! `Accept-Language` header, custom) proposes candidate cultures; the
//! pipeline validates them against the configured supported-culture lists
//! and picks the winner deterministically, falling back to the configured
//! default. See [`resolve_request_culture`].
//!
//! # Features
//!
//! - 🧭 Deterministic provider-chain culture negotiation with quality-value
//!   ordering and graceful fallback
//! - 📖 Line-oriented PO parser with multi-line, escaped, and pluralized
//!   entries, and strict malformed-input detection
//! - 🔄 Language-hierarchy catalog merging ("fr-FR" → "fr" → root), cached
//!   per resource
//! - 🦀 Idiomatic, modular, and ergonomic Rust API

pub mod catalog;
pub mod culture;
pub mod error;
pub mod localizer;
pub mod pipeline;
pub mod plural;
pub mod po;
pub mod providers;
pub mod request;

// Re-export most used types for easy consumption
pub use crate::{
    catalog::{FsPoSource, PoEntries, PoManager, PoSource, ResourceLookupBehavior},
    culture::{
        Culture, RequestCulture, clear_current_request_culture, current_request_culture,
        set_current_request_culture,
    },
    error::Error,
    localizer::{LocalizedString, PoStringLocalizer},
    pipeline::{RequestLocalizationOptions, ResolvedRequestCulture, resolve_request_culture},
    plural::{PluralRuleSet, PluralizationRule},
    po::PoEntry,
    providers::{
        AcceptLanguageHeaderRequestCultureProvider, CookieRequestCultureProvider,
        CustomRequestCultureProvider, ProviderCultureResult, QueryStringRequestCultureProvider,
        RequestCultureProvider,
    },
    request::{LanguageQuality, RequestContext},
};
