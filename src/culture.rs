//! Culture identifiers and the per-request culture pair.
//!
//! A [`Culture`] is a hierarchical locale tag ("fr-FR" → "fr" → the
//! invariant root). A [`RequestCulture`] pairs the formatting culture with
//! the UI (translation) culture for one request.

use std::cell::RefCell;
use std::fmt::{self, Display};

use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A locale tag such as `en-US`, with a distinguished invariant root.
///
/// Every non-root culture has exactly one parent obtained by dropping the
/// most specific subtag (variants, then region, then script, then language).
/// The invariant culture has the empty string as its name and is its own
/// parent, so chain walks terminate there.
///
/// Tags are canonicalized on parse: `Culture::parse("EN-us")` and
/// `Culture::parse("en-US")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Culture {
    id: Option<LanguageIdentifier>,
    name: String,
}

impl Culture {
    /// The invariant (root) culture. Its name is the empty string.
    pub fn invariant() -> Self {
        Culture {
            id: None,
            name: String::new(),
        }
    }

    /// Resolves a locale tag into a `Culture`.
    ///
    /// An empty or whitespace-only tag resolves to the invariant culture.
    /// Anything else must be a valid language identifier.
    ///
    /// # Example
    /// ```rust
    /// use polocale::Culture;
    /// let culture = Culture::parse("fr-FR")?;
    /// assert_eq!(culture.name(), "fr-FR");
    /// assert_eq!(culture.parent().name(), "fr");
    /// assert!(Culture::parse("not a culture").is_err());
    /// # Ok::<(), polocale::Error>(())
    /// ```
    pub fn parse(tag: &str) -> Result<Self, Error> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Culture::invariant());
        }

        let id: LanguageIdentifier = tag
            .parse()
            .map_err(|_| Error::InvalidCulture(tag.to_string()))?;
        let name = id.to_string();
        Ok(Culture { id: Some(id), name })
    }

    /// The canonical tag name, empty for the invariant culture.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_invariant(&self) -> bool {
        self.id.is_none()
    }

    /// The base language subtag ("fr" for "fr-FR"), empty for the invariant
    /// culture. Used for plural-rule selection.
    pub fn language(&self) -> &str {
        match &self.id {
            Some(id) => id.language.as_str(),
            None => "",
        }
    }

    /// The parent culture, obtained by dropping the most specific subtag.
    /// The invariant culture returns itself.
    pub fn parent(&self) -> Culture {
        let Some(id) = &self.id else {
            return Culture::invariant();
        };

        let mut parent = id.clone();
        if parent.variants().next().is_some() {
            parent.clear_variants();
        } else if parent.region.is_some() {
            parent.region = None;
        } else if parent.script.is_some() {
            parent.script = None;
        } else {
            return Culture::invariant();
        }

        let name = parent.to_string();
        Culture {
            id: Some(parent),
            name,
        }
    }

    /// Iterates this culture, then each successive parent, ending with the
    /// invariant culture.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }
}

impl Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Iterator over a culture's ancestor chain, self-inclusive.
pub struct Ancestors {
    next: Option<Culture>,
}

impl Iterator for Ancestors {
    type Item = Culture;

    fn next(&mut self) -> Option<Culture> {
        let current = self.next.take()?;
        if !current.is_invariant() {
            self.next = Some(current.parent());
        }
        Some(current)
    }
}

/// The culture pair attached to one request: `culture` drives formatting,
/// `ui_culture` drives translated text. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCulture {
    culture: Culture,
    ui_culture: Culture,
    time_zone: Option<String>,
}

impl RequestCulture {
    /// Creates a request culture with both halves set to the same value.
    pub fn new(culture: Culture) -> Self {
        RequestCulture {
            ui_culture: culture.clone(),
            culture,
            time_zone: None,
        }
    }

    /// Creates a request culture with independent formatting and UI halves.
    pub fn with_ui_culture(culture: Culture, ui_culture: Culture) -> Self {
        RequestCulture {
            culture,
            ui_culture,
            time_zone: None,
        }
    }

    /// Resolves both halves from locale tags.
    ///
    /// Fails with [`Error::InvalidCulture`] if either tag cannot be resolved.
    pub fn from_names(culture: &str, ui_culture: &str) -> Result<Self, Error> {
        Ok(RequestCulture::with_ui_culture(
            Culture::parse(culture)?,
            Culture::parse(ui_culture)?,
        ))
    }

    /// Attaches an optional time zone identifier.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    pub fn ui_culture(&self) -> &Culture {
        &self.ui_culture
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }
}

thread_local! {
    static CURRENT_REQUEST_CULTURE: RefCell<Option<RequestCulture>> =
        const { RefCell::new(None) };
}

/// Sets the ambient request culture for the current thread.
///
/// The HTTP host calls this with the pipeline's output so that unpinned
/// localizers pick up the request's UI culture.
pub fn set_current_request_culture(request_culture: RequestCulture) {
    CURRENT_REQUEST_CULTURE.with(|cell| {
        *cell.borrow_mut() = Some(request_culture);
    });
}

/// Clears the ambient request culture for the current thread.
pub fn clear_current_request_culture() {
    CURRENT_REQUEST_CULTURE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns the ambient request culture for the current thread, or the
/// invariant pair when none has been set.
pub fn current_request_culture() -> RequestCulture {
    CURRENT_REQUEST_CULTURE.with(|cell| {
        cell.borrow()
            .clone()
            .unwrap_or_else(|| RequestCulture::new(Culture::invariant()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes_tag() {
        let culture = Culture::parse("EN-us").unwrap();
        assert_eq!(culture.name(), "en-US");
        assert_eq!(culture, Culture::parse("en-US").unwrap());
    }

    #[test]
    fn test_parse_empty_is_invariant() {
        let culture = Culture::parse("").unwrap();
        assert!(culture.is_invariant());
        assert_eq!(culture.name(), "");

        let culture = Culture::parse("   ").unwrap();
        assert!(culture.is_invariant());
    }

    #[test]
    fn test_parse_invalid_tag() {
        assert!(matches!(
            Culture::parse("not a culture"),
            Err(Error::InvalidCulture(_))
        ));
    }

    #[test]
    fn test_parent_chain() {
        let culture = Culture::parse("fr-FR").unwrap();
        let parent = culture.parent();
        assert_eq!(parent.name(), "fr");

        let grandparent = parent.parent();
        assert!(grandparent.is_invariant());

        // Invariant is its own parent.
        assert!(grandparent.parent().is_invariant());
    }

    #[test]
    fn test_parent_drops_script_before_language() {
        let culture = Culture::parse("zh-Hans-CN").unwrap();
        assert_eq!(culture.parent().name(), "zh-Hans");
        assert_eq!(culture.parent().parent().name(), "zh");
        assert!(culture.parent().parent().parent().is_invariant());
    }

    #[test]
    fn test_ancestors_end_with_invariant() {
        let chain: Vec<String> = Culture::parse("fr-FR")
            .unwrap()
            .ancestors()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(chain, vec!["fr-FR".to_string(), "fr".to_string(), String::new()]);
    }

    #[test]
    fn test_language_subtag() {
        assert_eq!(Culture::parse("ar-SA").unwrap().language(), "ar");
        assert_eq!(Culture::invariant().language(), "");
    }

    #[test]
    fn test_request_culture_same_halves() {
        let request_culture = RequestCulture::new(Culture::parse("ar-SA").unwrap());
        assert_eq!(request_culture.culture().name(), "ar-SA");
        assert_eq!(request_culture.ui_culture().name(), "ar-SA");
        assert_eq!(request_culture.time_zone(), None);
    }

    #[test]
    fn test_request_culture_from_names_invalid() {
        assert!(RequestCulture::from_names("en-US", "no such tag").is_err());
    }

    #[test]
    fn test_request_culture_time_zone() {
        let request_culture = RequestCulture::new(Culture::parse("en-US").unwrap())
            .with_time_zone("America/New_York");
        assert_eq!(request_culture.time_zone(), Some("America/New_York"));
    }

    #[test]
    fn test_current_request_culture_defaults_to_invariant() {
        clear_current_request_culture();
        let current = current_request_culture();
        assert!(current.culture().is_invariant());
        assert!(current.ui_culture().is_invariant());
    }

    #[test]
    fn test_set_and_clear_current_request_culture() {
        let request_culture = RequestCulture::from_names("fr-FR", "fr").unwrap();
        set_current_request_culture(request_culture.clone());
        assert_eq!(current_request_culture(), request_culture);

        clear_current_request_culture();
        assert!(current_request_culture().culture().is_invariant());
    }
}
