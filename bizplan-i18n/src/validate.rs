//! Running the checks over every locale of a source.
//!
//! This is where load failures are sorted out: a base locale that cannot be
//! loaded aborts the run with [`I18nError::BaseLocale`], any other locale that
//! cannot be loaded becomes a [`LocaleReport::Failed`] entry and the run goes
//! on.

use serde::Serialize;
use std::path::Path;

use crate::compare::{BaseSchema, ComparisonResult, compare_locale};
use crate::config::CheckConfig;
use crate::error::{I18nError, Result};
use crate::fill::fill_with_report;
use crate::source::LocaleDir;
use crate::{TreeLoader, TreeStore};

/// Outcome of validating one target locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocaleReport {
    Compared(ComparisonResult),
    Failed { locale: String, reason: String },
}

impl LocaleReport {
    #[must_use]
    pub fn locale(&self) -> &str {
        match self {
            Self::Compared(result) => &result.locale,
            Self::Failed { locale, .. } => locale,
        }
    }

    #[must_use]
    pub const fn comparison(&self) -> Option<&ComparisonResult> {
        match self {
            Self::Compared(result) => Some(result),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_clean(&self, strict: bool) -> bool {
        match self {
            Self::Compared(result) => result.is_clean(strict),
            Self::Failed { .. } => false,
        }
    }
}

/// Totals across all locale reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub locales_compared: usize,
    pub locales_failed: usize,
    pub missing_keys: usize,
    pub type_mismatches: usize,
    pub extra_keys: usize,
    pub empty_values: usize,
    pub placeholder_mismatches: usize,
}

impl RunSummary {
    #[must_use]
    pub fn from_reports(reports: &[LocaleReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            match report {
                LocaleReport::Compared(result) => {
                    summary.locales_compared += 1;
                    summary.missing_keys += result.missing_keys.len();
                    summary.type_mismatches += result.type_mismatches.len();
                    summary.extra_keys += result.extra_keys.len();
                    summary.empty_values += result.empty_values.len();
                    summary.placeholder_mismatches += result.placeholder_mismatches.len();
                }
                LocaleReport::Failed { .. } => summary.locales_failed += 1,
            }
            summary
        })
    }

    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.locales_failed + self.missing_keys + self.type_mismatches + self.extra_keys
    }

    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.empty_values + self.placeholder_mismatches
    }

    #[must_use]
    pub const fn passed(&self, strict: bool) -> bool {
        self.error_count() == 0 && !(strict && self.warning_count() > 0)
    }
}

/// Outcome of gap-filling one target locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FillReport {
    Filled {
        locale: String,
        backfilled_keys: Vec<String>,
        written: bool,
    },
    Failed {
        locale: String,
        reason: String,
    },
}

impl FillReport {
    #[must_use]
    pub fn locale(&self) -> &str {
        match self {
            Self::Filled { locale, .. } | Self::Failed { locale, .. } => locale,
        }
    }
}

/// Validate every non-base locale in `locales_dir` against `base_locale`.
///
/// # Errors
///
/// Returns [`I18nError::BaseLocale`] if the base locale is absent or cannot be
/// loaded. Other locales that fail to load are reported, not returned as errors.
pub fn validate_locales(locales_dir: &Path, base_locale: &str) -> Result<Vec<LocaleReport>> {
    let config = CheckConfig::default()
        .with_locales_dir(locales_dir)
        .with_base_locale(base_locale);
    validate_with(&LocaleDir::new(locales_dir), &config)
}

/// Validate the target locales of `loader` selected by `config`.
///
/// # Errors
///
/// Returns [`I18nError::BaseLocale`] if the base locale is absent or cannot be
/// loaded.
pub fn validate_with<L: TreeLoader>(
    loader: &L,
    config: &CheckConfig,
) -> Result<Vec<LocaleReport>> {
    let (schema, targets) = load_base(loader, config)?;

    let reports = targets
        .into_iter()
        .map(|locale| match loader.load_tree(&locale) {
            Ok(tree) => LocaleReport::Compared(compare_locale(&locale, &schema, &tree, config)),
            Err(e) => {
                log::warn!("skipping locale {locale}: {e}");
                LocaleReport::Failed {
                    locale,
                    reason: e.to_string(),
                }
            }
        })
        .collect();

    Ok(reports)
}

/// Backfill every target locale from the base locale and persist the result.
///
/// Locales whose merged tree equals what is on disk are not rewritten. With
/// `dry_run` nothing is written. A locale that cannot be loaded or saved is
/// reported as [`FillReport::Failed`] and the other locales are still filled.
///
/// # Errors
///
/// Returns [`I18nError::BaseLocale`] if the base locale is absent or cannot be
/// loaded.
pub fn fill_locales<S>(
    source: &S,
    config: &CheckConfig,
    dry_run: bool,
) -> Result<Vec<FillReport>>
where
    S: TreeLoader + TreeStore,
{
    let (schema, targets) = load_base(source, config)?;

    let reports = targets
        .into_iter()
        .map(|locale| {
            let target = match source.load_tree(&locale) {
                Ok(tree) => tree,
                Err(e) => {
                    log::warn!("skipping locale {locale}: {e}");
                    return FillReport::Failed {
                        locale,
                        reason: e.to_string(),
                    };
                }
            };

            let outcome = fill_with_report(&schema.tree, &target);
            let should_write = outcome.changed() && !dry_run;
            if should_write && let Err(e) = source.save_tree(&locale, &outcome.tree) {
                log::warn!("could not write locale {locale}: {e}");
                return FillReport::Failed {
                    locale,
                    reason: e.to_string(),
                };
            }

            log::debug!(
                "{locale}: {} keys backfilled{}",
                outcome.backfilled_keys.len(),
                if dry_run { " (dry run)" } else { "" }
            );
            FillReport::Filled {
                locale,
                backfilled_keys: outcome.backfilled_keys,
                written: should_write,
            }
        })
        .collect();

    Ok(reports)
}

fn load_base<L: TreeLoader>(
    loader: &L,
    config: &CheckConfig,
) -> Result<(BaseSchema, Vec<String>)> {
    let base = config.base_locale.as_str();
    let discovered = loader
        .list_locales()
        .map_err(|e| I18nError::base_locale(base, format!("locales could not be listed: {e}")))?;

    if !discovered.iter().any(|locale| locale == base) {
        return Err(I18nError::base_locale(
            base,
            format!(
                "no translation tree found for the base locale in {}",
                config.locales_dir.display()
            ),
        ));
    }

    let tree = loader
        .load_tree(base)
        .map_err(|e| I18nError::base_locale(base, e.to_string()))?;
    let schema = BaseSchema::new(base, tree);
    log::debug!("base locale {base}: {} keys", schema.keys.len());

    let mut targets: Vec<String> = discovered
        .into_iter()
        .filter(|locale| config.includes_locale(locale))
        .collect();
    for requested in &config.locales {
        if requested != base && !targets.contains(requested) {
            targets.push(requested.clone());
        }
    }

    Ok((schema, targets))
}
