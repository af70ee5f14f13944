//! The string localizer façade.
//!
//! Combines a shared [`PoManager`] with either an explicitly pinned culture
//! or the ambient per-request culture to answer localized-string lookups.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{PoManager, ResourceLookupBehavior};
use crate::culture::{self, Culture};
use crate::error::Error;

/// A resolved localized string.
///
/// `resource_not_found` is true when `value` is the fallback name rather
/// than a translation from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedString {
    pub name: String,
    pub value: String,
    pub resource_not_found: bool,
}

impl LocalizedString {
    pub fn new(name: impl Into<String>, value: impl Into<String>, resource_not_found: bool) -> Self {
        LocalizedString {
            name: name.into(),
            value: value.into(),
            resource_not_found,
        }
    }
}

impl Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Provides localized strings for one resource base name.
///
/// Unpinned localizers follow the thread's ambient request culture (its UI
/// half); [`PoStringLocalizer::with_culture`] returns a new localizer pinned
/// to an explicit culture without mutating the original.
#[derive(Clone)]
pub struct PoStringLocalizer {
    manager: Arc<PoManager>,
    culture: Option<Culture>,
}

impl PoStringLocalizer {
    pub fn new(manager: Arc<PoManager>) -> Self {
        PoStringLocalizer {
            manager,
            culture: None,
        }
    }

    /// Returns a new localizer pinned to `culture`. The receiver keeps its
    /// own culture.
    pub fn with_culture(&self, culture: Culture) -> Self {
        PoStringLocalizer {
            manager: self.manager.clone(),
            culture: Some(culture),
        }
    }

    fn resolve_culture(&self) -> Culture {
        self.culture
            .clone()
            .unwrap_or_else(|| culture::current_request_culture().ui_culture().clone())
    }

    /// Looks up `name` for the effective culture.
    ///
    /// A miss yields the name itself with `resource_not_found` set, or
    /// [`Error::LocalizedStringNotFound`] in strict lookup mode.
    pub fn get(&self, name: &str) -> Result<LocalizedString, Error> {
        let culture = self.resolve_culture();
        match self.manager.get_string_safely(name, &culture)? {
            Some(value) => Ok(LocalizedString::new(name, value, false)),
            None => self.miss(name, name.to_string()),
        }
    }

    /// Looks up `name` and substitutes positional `{0}`, `{1}`, … arguments
    /// into the resolved (or fallback-name) template.
    pub fn format(&self, name: &str, args: &[&dyn Display]) -> Result<LocalizedString, Error> {
        let culture = self.resolve_culture();
        match self.manager.get_string_safely(name, &culture)? {
            Some(template) => Ok(LocalizedString::new(
                name,
                format_positional(&template, args),
                false,
            )),
            None => self.miss(name, format_positional(name, args)),
        }
    }

    /// Looks up the plural form of `name` selected by `count`, substituting
    /// the count for `{0}` in the selected template.
    pub fn pluralize(&self, name: &str, count: u64) -> Result<LocalizedString, Error> {
        let culture = self.resolve_culture();
        match self.manager.plural_template(name, count, &culture)? {
            Some(template) => Ok(LocalizedString::new(
                name,
                format_positional(&template, &[&count]),
                false,
            )),
            None => self.miss(name, format_positional(name, &[&count])),
        }
    }

    /// All localized strings of the effective culture's merged catalog.
    ///
    /// The returned iterator is finite; call again for a fresh pass over the
    /// cached catalog.
    pub fn all_strings(
        &self,
        include_parent_cultures: bool,
    ) -> Result<impl Iterator<Item = LocalizedString> + use<>, Error> {
        let culture = self.resolve_culture();
        let pairs = self
            .manager
            .all_strings(include_parent_cultures, &culture)?;
        Ok(pairs.into_iter().map(|(name, translation)| {
            let resource_not_found = translation.is_none();
            let value = translation.unwrap_or_else(|| name.clone());
            LocalizedString::new(name, value, resource_not_found)
        }))
    }

    fn miss(&self, name: &str, value: String) -> Result<LocalizedString, Error> {
        match self.manager.lookup_behavior() {
            ResourceLookupBehavior::UseNameIfNotFound => {
                Ok(LocalizedString::new(name, value, true))
            }
            ResourceLookupBehavior::ThrowIfNotFound => {
                Err(Error::LocalizedStringNotFound(name.to_string()))
            }
        }
    }
}

/// Substitutes positional `{0}`, `{1}`, … placeholders with the arguments'
/// display forms. `{{` and `}}` escape to literal braces; placeholders with
/// no matching argument are reproduced verbatim.
fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' {
            if chars.peek() == Some(&'{') {
                chars.next();
                out.push('{');
                continue;
            }

            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }

            if !digits.is_empty() && chars.peek() == Some(&'}') {
                chars.next();
                match digits.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(&digits);
                        out.push('}');
                    }
                }
            } else {
                out.push('{');
                out.push_str(&digits);
            }
        } else if c == '}' {
            if chars.peek() == Some(&'}') {
                chars.next();
            }
            out.push('}');
        } else {
            out.push(c);
        }
    }

    out
}
