//! The PO resource catalog manager.
//!
//! Locates the PO resource for a requested culture, merges it with its
//! ancestors' (most specific wins), caches the merged catalog per resource
//! key, and answers string and plural lookups.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::culture::Culture;
use crate::error::Error;
use crate::plural::PluralRuleSet;
use crate::po::{self, PoEntry};

/// Behaviors to be used when a resource key appears to be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResourceLookupBehavior {
    /// Use the resource key itself as a fallback value.
    #[default]
    UseNameIfNotFound,
    /// Fail the lookup with [`Error::LocalizedStringNotFound`].
    ThrowIfNotFound,
}

/// Loads PO text for a resolved resource name.
///
/// This is the external collaborator boundary: the manager constructs names
/// like `MyApp.Resources.Messages.fr-FR.po` and asks the source for the
/// text. `Ok(None)` means the resource does not exist, which is not an
/// error; the culture fallback walk simply continues.
pub trait PoSource: Send + Sync {
    fn load(&self, resource_name: &str) -> Result<Option<String>, Error>;
}

/// A [`PoSource`] reading resource names as file names under one directory,
/// with BOM-aware decoding (UTF-8 assumed when no BOM is present).
#[derive(Debug, Clone)]
pub struct FsPoSource {
    root: PathBuf,
}

impl FsPoSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsPoSource { root: root.into() }
    }
}

impl PoSource for FsPoSource {
    fn load(&self, resource_name: &str) -> Result<Option<String>, Error> {
        let path = self.root.join(resource_name);
        if !path.is_file() {
            return Ok(None);
        }

        let file = File::open(&path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding_rs::UTF_8))
            .bom_override(true)
            .build(file);

        let mut text = String::new();
        decoder.read_to_string(&mut text).map_err(Error::Io)?;
        Ok(Some(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource_name: String,
    include_parents: bool,
}

/// Merged catalogs share one map type keyed by the untranslated string.
pub type PoEntries = HashMap<String, PoEntry>;

/// Manages PO catalogs for one logical resource base name.
///
/// Thread-safe: catalogs are computed on first use and cached per
/// `(resource name, include-parents)` key. Races on first computation are
/// tolerated: whole maps are published atomically, whichever install lands
/// first is kept, and repeated calls return the identical `Arc`.
///
/// # Example
/// ```rust,no_run
/// use polocale::{Culture, FsPoSource, PoManager};
///
/// let manager = PoManager::new("Messages", "MyApp", FsPoSource::new("resources"));
/// let value = manager.get_string("Hello", &Culture::parse("fr-FR")?)?;
/// # Ok::<(), polocale::Error>(())
/// ```
pub struct PoManager {
    base_name: String,
    root_namespace: String,
    resources_path: String,
    lookup_behavior: ResourceLookupBehavior,
    plural_rules: PluralRuleSet,
    source: Box<dyn PoSource>,
    cache: RwLock<HashMap<CacheKey, Arc<PoEntries>>>,
}

impl PoManager {
    pub fn new(
        base_name: impl Into<String>,
        root_namespace: impl Into<String>,
        source: impl PoSource + 'static,
    ) -> Self {
        PoManager {
            base_name: base_name.into(),
            root_namespace: root_namespace.into(),
            resources_path: String::new(),
            lookup_behavior: ResourceLookupBehavior::default(),
            plural_rules: PluralRuleSet::new(),
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the configured resources subpath (e.g. `Resources`), joined into
    /// the resource-name prefix.
    pub fn with_resources_path(mut self, resources_path: impl Into<String>) -> Self {
        self.resources_path = resources_path.into();
        self
    }

    pub fn with_lookup_behavior(mut self, behavior: ResourceLookupBehavior) -> Self {
        self.lookup_behavior = behavior;
        self
    }

    pub fn with_plural_rules(mut self, plural_rules: PluralRuleSet) -> Self {
        self.plural_rules = plural_rules;
        self
    }

    pub fn lookup_behavior(&self) -> ResourceLookupBehavior {
        self.lookup_behavior
    }

    /// The resolved resource name for one culture:
    /// `{prefix}.{culture}.po`, or `{prefix}.po` for the invariant culture.
    fn resource_name(&self, culture: &Culture) -> String {
        let prefix = self.resource_prefix();
        if culture.is_invariant() {
            format!("{prefix}.po")
        } else {
            format!("{prefix}.{}.po", culture.name())
        }
    }

    fn resource_prefix(&self) -> String {
        if self.resources_path.is_empty() {
            self.base_name.clone()
        } else {
            format!(
                "{}.{}.{}",
                self.root_namespace,
                self.resources_path,
                trim_prefix(&self.base_name, &format!("{}.", self.root_namespace)),
            )
        }
    }

    /// Returns the merged catalog for a culture.
    ///
    /// Walks the culture's ancestor chain from most to least specific,
    /// merging each culture's PO file without overwriting already-present
    /// keys. A culture without a PO file contributes nothing; when no file
    /// exists for any culture in the chain the result is
    /// [`Error::MissingManifest`].
    ///
    /// Results are cached; repeated calls with the same key return the
    /// identical `Arc`.
    pub fn po_entries(
        &self,
        culture: &Culture,
        include_parent_cultures: bool,
    ) -> Result<Arc<PoEntries>, Error> {
        let key = CacheKey {
            resource_name: self.resource_name(culture),
            include_parents: include_parent_cultures,
        };

        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entries) = cache.get(&key) {
                return Ok(entries.clone());
            }
        }

        let mut merged = PoEntries::new();
        let mut found_any = false;
        let mut current = culture.clone();
        loop {
            if let Some(text) = self.source.load(&self.resource_name(&current))? {
                found_any = true;
                for (original, entry) in po::parse_str(&text)? {
                    merged.entry(original).or_insert(entry);
                }
            }

            if !include_parent_cultures || current.is_invariant() {
                break;
            }
            current = current.parent();
        }

        if !found_any {
            return Err(Error::MissingManifest(self.resource_prefix()));
        }

        let entries = Arc::new(merged);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(key).or_insert(entries).clone())
    }

    /// Looks up the translation for `name`, walking the culture chain.
    ///
    /// A present entry with an empty translation counts as untranslated.
    /// Misses follow the configured [`ResourceLookupBehavior`].
    pub fn get_string(&self, name: &str, culture: &Culture) -> Result<String, Error> {
        match self.get_string_safely(name, culture)? {
            Some(value) => Ok(value),
            None => self.miss(name),
        }
    }

    /// Looks up the plural translation for `name` selected by `count`
    /// through the culture's plural rule. Misses follow the configured
    /// [`ResourceLookupBehavior`].
    pub fn get_string_plural(
        &self,
        name: &str,
        count: u64,
        culture: &Culture,
    ) -> Result<String, Error> {
        match self.plural_template(name, count, culture)? {
            Some(value) => Ok(value),
            None => self.miss(name),
        }
    }

    /// Policy-free lookup: `Ok(None)` when the key is absent from the fully
    /// merged catalog or carries no translation.
    pub fn get_string_safely(
        &self,
        name: &str,
        culture: &Culture,
    ) -> Result<Option<String>, Error> {
        if name.is_empty() {
            return Err(Error::invalid_argument("resource name must not be empty"));
        }

        let entries = self.po_entries(culture, true)?;
        Ok(entries
            .get(name)
            .and_then(|entry| entry.effective_translation())
            .map(str::to_string))
    }

    /// Policy-free plural lookup. An entry without plural forms answers
    /// with its singular translation.
    pub fn plural_template(
        &self,
        name: &str,
        count: u64,
        culture: &Culture,
    ) -> Result<Option<String>, Error> {
        if name.is_empty() {
            return Err(Error::invalid_argument("resource name must not be empty"));
        }

        let entries = self.po_entries(culture, true)?;
        let Some(entry) = entries.get(name) else {
            return Ok(None);
        };

        if !entry.has_plural_forms() {
            return Ok(entry.effective_translation().map(str::to_string));
        }

        let rule = self.plural_rules.rule_for(culture.language())?;
        Ok(entry.translation_plurals.get(&rule(count)).cloned())
    }

    /// All `(key, translation)` pairs of the merged catalog. The translation
    /// is `None` for untranslated entries.
    pub fn all_strings(
        &self,
        include_parent_cultures: bool,
        culture: &Culture,
    ) -> Result<Vec<(String, Option<String>)>, Error> {
        let entries = self.po_entries(culture, include_parent_cultures)?;
        Ok(entries
            .iter()
            .map(|(key, entry)| {
                (
                    key.clone(),
                    entry.effective_translation().map(str::to_string),
                )
            })
            .collect())
    }

    fn miss(&self, name: &str) -> Result<String, Error> {
        match self.lookup_behavior {
            ResourceLookupBehavior::UseNameIfNotFound => Ok(name.to_string()),
            ResourceLookupBehavior::ThrowIfNotFound => {
                Err(Error::LocalizedStringNotFound(name.to_string()))
            }
        }
    }
}

fn trim_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix).unwrap_or(name)
}
