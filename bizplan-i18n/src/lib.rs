//! Business plan i18n toolkit
//!
//! Consistency checks for the site's translation trees. The base locale (EN)
//! is the schema of record; every other locale is flattened, type-mapped and
//! diffed against it, and can be backfilled from it.
//!
//! The comparison and fill functions are pure and work on already-loaded
//! [`TranslationTree`]s. Loading and persisting go through the
//! [`TreeLoader`] and [`TreeStore`] traits; [`LocaleDir`] implements both for
//! a directory of JSON files.

pub mod compare;
pub mod config;
pub mod error;
pub mod fill;
pub mod keys;
pub mod placeholders;
pub mod source;
pub mod tree;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use compare::{
    BaseSchema, ComparisonResult, TypeMismatch, compare_locale, compare_types, extra_keys,
    missing_keys,
};
pub use config::CheckConfig;
pub use error::{I18nError, Result};
pub use fill::{FillOutcome, fill_missing, fill_with_report};
pub use keys::{KeyIndex, extract_keys};
pub use placeholders::{PlaceholderMismatch, compare_placeholders};
pub use source::{LocaleDir, LocaleLayout};
pub use tree::{TranslationTree, ValueKind, lookup};
pub use types::{TypeDescriptor, TypeMap, build_type_map};
pub use validate::{
    FillReport, LocaleReport, RunSummary, fill_locales, validate_locales, validate_with,
};

/// Source of locale trees.
///
/// The checks only ever see the returned [`TranslationTree`]; how it is materialised
/// (files, embedded data, a build step) is up to the implementation.
pub trait TreeLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// List the locale identifiers this source can load.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be enumerated.
    fn list_locales(&self) -> std::result::Result<Vec<String>, Self::Error>;

    /// Load one locale's full translation tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be read or parsed.
    fn load_tree(&self, locale: &str) -> std::result::Result<TranslationTree, Self::Error>;
}

/// Destination for filled locale trees.
pub trait TreeStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a locale's translation tree, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be written.
    fn save_tree(
        &self,
        locale: &str,
        tree: &TranslationTree,
    ) -> std::result::Result<(), Self::Error>;
}
