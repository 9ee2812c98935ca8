//! Locale trees on disk.
//!
//! A locales directory holds either one file per locale (`de.json`) or one
//! directory per locale with a file per namespace (`de/market.json`). The
//! namespaced form loads as a single tree keyed by namespace.
//!
//! Only entries named like a language tag (`de`, `en-GB`, `pt_BR`) are
//! discovered as locales, so `check.json`, `schemas/` or `.cache/` living
//! beside the locales are ignored. An explicitly requested locale is
//! resolved by name and does not need to match.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{I18nError, Result};
use crate::{TreeLoader, TreeStore};

static LOCALE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}([-_][A-Za-z0-9]{2,8})*$").expect("locale tag pattern compiles")
});

/// Where one locale's tree lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleLayout {
    File(PathBuf),
    Namespaced(PathBuf),
}

/// A directory of locale JSON files.
#[derive(Debug, Clone)]
pub struct LocaleDir {
    root: PathBuf,
}

impl LocaleDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a locale to its file or namespace directory. A flat file wins
    /// when both exist.
    #[must_use]
    pub fn layout(&self, locale: &str) -> Option<LocaleLayout> {
        let file = self.root.join(format!("{locale}.json"));
        if file.is_file() {
            return Some(LocaleLayout::File(file));
        }
        let dir = self.root.join(locale);
        match json_files(&dir) {
            Ok(files) if !files.is_empty() => Some(LocaleLayout::Namespaced(dir)),
            _ => None,
        }
    }
}

impl TreeLoader for LocaleDir {
    type Error = I18nError;

    fn list_locales(&self) -> Result<Vec<String>> {
        let mut locales = BTreeSet::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let name = if path.is_file() {
                path.file_stem()
            } else {
                path.file_name()
            };
            let Some(name) = name.and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_locale_tag(name) {
                log::debug!("skipping {}: not a locale name", path.display());
                continue;
            }
            let is_locale = if path.is_file() {
                is_json(&path)
            } else {
                path.is_dir() && !json_files(&path)?.is_empty()
            };
            if is_locale {
                locales.insert(name.to_string());
            }
        }
        Ok(locales.into_iter().collect())
    }

    fn load_tree(&self, locale: &str) -> Result<Value> {
        match self.layout(locale) {
            Some(LocaleLayout::File(path)) => read_tree(locale, &path),
            Some(LocaleLayout::Namespaced(dir)) => {
                let files = json_files(&dir)
                    .map_err(|e| I18nError::locale_load(locale, &dir, e.to_string()))?;
                let mut namespaces = Map::new();
                for path in files {
                    let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    namespaces.insert(namespace.to_string(), read_tree(locale, &path)?);
                }
                log::debug!("loaded {} namespaces for {locale}", namespaces.len());
                Ok(Value::Object(namespaces))
            }
            None => Err(I18nError::locale_load(
                locale,
                self.root.join(format!("{locale}.json")),
                "no translation file found",
            )),
        }
    }
}

impl TreeStore for LocaleDir {
    type Error = I18nError;

    fn save_tree(&self, locale: &str, tree: &Value) -> Result<()> {
        match self.layout(locale) {
            Some(LocaleLayout::Namespaced(dir)) => {
                let Value::Object(namespaces) = tree else {
                    return Err(I18nError::persist(
                        locale,
                        dir,
                        "namespaced locale needs a mapping of namespaces",
                    ));
                };
                for (namespace, subtree) in namespaces {
                    write_tree(locale, &dir.join(format!("{namespace}.json")), subtree)?;
                }
                Ok(())
            }
            Some(LocaleLayout::File(path)) => write_tree(locale, &path, tree),
            None => write_tree(locale, &self.root.join(format!("{locale}.json")), tree),
        }
    }
}

fn is_locale_tag(name: &str) -> bool {
    LOCALE_TAG.is_match(name)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn json_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_json(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_tree(locale: &str, path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| I18nError::locale_load(locale, path, e.to_string()))?;
    parse_tree(&content)
        .map_err(|e| I18nError::locale_load(locale, path, format!("invalid JSON: {e}")))
}

fn write_tree(locale: &str, path: &Path, tree: &Value) -> Result<()> {
    let rendered = to_pretty_json(tree)?;
    fs::write(path, rendered).map_err(|e| I18nError::persist(locale, path, e.to_string()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Parse a locale document, accepting `//` and `/* */` comments.
///
/// # Errors
///
/// Returns an error if the document is not valid JSON once comments are removed.
pub fn parse_tree(content: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(&strip_json_comments(content))
}

/// Render a tree the way locale files are kept: two-space indent, trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty_json(tree: &Value) -> std::result::Result<String, serde_json::Error> {
    let mut rendered = serde_json::to_string_pretty(tree)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Remove comments outside string literals. Newlines are kept so parse
/// errors still point at the right line.
fn strip_json_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (ch, next) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}
