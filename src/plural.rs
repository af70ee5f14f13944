//! Plural-form selection rules.
//!
//! A [`PluralizationRule`] maps a count to the plural-form index used to
//! pick among a PO entry's `msgstr[N]` translations. The built-in table is a
//! curated subset keyed by base language subtag, not a CLDR rule database;
//! applications can inject their own rules per language.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::error::Error;

/// Maps a count to a plural-form index.
pub type PluralizationRule = Arc<dyn Fn(u64) -> usize + Send + Sync>;

lazy_static! {
    /// Static mapping from base language subtag → plural rule (cardinals).
    static ref RULE_TABLE: HashMap<&'static str, PluralizationRule> = {
        let mut m: HashMap<&'static str, PluralizationRule> = HashMap::new();

        // singular for exactly one (most Germanic/Romance languages)
        let two_form: PluralizationRule = Arc::new(|n| if n == 1 { 0 } else { 1 });
        for code in [
            "en","de","nl","sv","da","nb","nn","no","is","fi","et","el","it","es","pt",
            "ca","eu","gl","af","sw","ur","hi","bn","fa","hu","sq","bg","mk","ta","te",
        ] {
            m.insert(code, two_form.clone());
        }

        // no plural distinction (East/Southeast Asian common cases)
        let one_form: PluralizationRule = Arc::new(|_| 0);
        for code in ["ja","zh","ko","th","vi","id","ms","km","lo","my"] {
            m.insert(code, one_form.clone());
        }

        // singular for zero and one
        let zero_one_singular: PluralizationRule = Arc::new(|n| if n <= 1 { 0 } else { 1 });
        for code in ["fr","hy","kab","tr"] {
            m.insert(code, zero_one_singular.clone());
        }

        // Slavic (Russian group): one / few / many
        let slavic: PluralizationRule = Arc::new(|n| {
            if n % 10 == 1 && n % 100 != 11 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        });
        for code in ["ru","uk","be","sr","hr","bs"] {
            m.insert(code, slavic.clone());
        }

        // Polish
        let polish: PluralizationRule = Arc::new(|n| {
            if n == 1 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        });
        m.insert("pl", polish);

        // Czech/Slovak
        let czech: PluralizationRule = Arc::new(|n| {
            if n == 1 {
                0
            } else if (2..=4).contains(&n) {
                1
            } else {
                2
            }
        });
        for code in ["cs","sk"] {
            m.insert(code, czech.clone());
        }

        // Arabic: zero / one / two / few / many / other
        let arabic: PluralizationRule = Arc::new(|n| match n {
            0 => 0,
            1 => 1,
            2 => 2,
            _ if (3..=10).contains(&(n % 100)) => 3,
            _ if n % 100 >= 11 => 4,
            _ => 5,
        });
        m.insert("ar", arabic);

        m
    };
}

/// Per-language plural rules with application-supplied overrides.
///
/// Lookup is by base language subtag; unknown languages are an error rather
/// than a silent guess.
#[derive(Clone, Default)]
pub struct PluralRuleSet {
    overrides: HashMap<String, PluralizationRule>,
}

impl PluralRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the rule for one base language subtag.
    pub fn with_rule(mut self, language: impl Into<String>, rule: PluralizationRule) -> Self {
        self.overrides.insert(language.into(), rule);
        self
    }

    /// Returns the rule for a base language subtag.
    ///
    /// Fails with [`Error::UnsupportedCulture`] when the language has
    /// neither an override nor a built-in rule.
    pub fn rule_for(&self, language: &str) -> Result<PluralizationRule, Error> {
        if let Some(rule) = self.overrides.get(language) {
            return Ok(rule.clone());
        }

        RULE_TABLE
            .get(language)
            .cloned()
            .ok_or_else(|| Error::UnsupportedCulture(language.to_string()))
    }
}

impl std::fmt::Debug for PluralRuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluralRuleSet")
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_rule() {
        let rules = PluralRuleSet::new();
        let rule = rules.rule_for("en").unwrap();
        assert_eq!(rule(1), 0);
        assert_eq!(rule(0), 1);
        assert_eq!(rule(5), 1);
    }

    #[test]
    fn test_french_rule_zero_is_singular() {
        let rules = PluralRuleSet::new();
        let rule = rules.rule_for("fr").unwrap();
        assert_eq!(rule(0), 0);
        assert_eq!(rule(1), 0);
        assert_eq!(rule(2), 1);
    }

    #[test]
    fn test_japanese_rule_single_form() {
        let rules = PluralRuleSet::new();
        let rule = rules.rule_for("ja").unwrap();
        assert_eq!(rule(1), 0);
        assert_eq!(rule(100), 0);
    }

    #[test]
    fn test_russian_rule() {
        let rules = PluralRuleSet::new();
        let rule = rules.rule_for("ru").unwrap();
        assert_eq!(rule(1), 0);
        assert_eq!(rule(21), 0);
        assert_eq!(rule(2), 1);
        assert_eq!(rule(11), 2);
        assert_eq!(rule(5), 2);
    }

    #[test]
    fn test_arabic_rule() {
        let rules = PluralRuleSet::new();
        let rule = rules.rule_for("ar").unwrap();
        assert_eq!(rule(0), 0);
        assert_eq!(rule(1), 1);
        assert_eq!(rule(2), 2);
        assert_eq!(rule(3), 3);
        assert_eq!(rule(11), 4);
        assert_eq!(rule(100), 5);
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        let rules = PluralRuleSet::new();
        assert!(matches!(
            rules.rule_for("??"),
            Err(Error::UnsupportedCulture(_))
        ));
    }

    #[test]
    fn test_override_wins_over_builtin() {
        let rules =
            PluralRuleSet::new().with_rule("en", Arc::new(|n| if n == 1 { 1 } else { 0 }));
        let rule = rules.rule_for("en").unwrap();
        assert_eq!(rule(1), 1);
        assert_eq!(rule(5), 0);
    }
}
