//! Localized message templates.
//!
//! A [`MessageCatalog`] maps `(locale, key)` pairs to templates with
//! positional `{0}`, `{1}`… placeholders. Lookups fall back from `fr-CA` to
//! `fr`, then to the catalog's fallback locale, and finally to the key
//! itself, so a missing translation never fails.

use std::collections::HashMap;
use std::fmt::{self, Write};

use log::debug;
use phf::phf_map;

use crate::error::CatalogError;

/// Locale the built-in templates are registered under.
pub const DEFAULT_LOCALE: &str = "en";

/// Built-in English templates for the relative-time keys.
static DEFAULT_MESSAGES: phf::Map<&'static str, &'static str> = phf_map! {
    "delta.just_now" => "Just now",
    "delta.one_second" => "One second ago",
    "delta.seconds" => "Less than a minute ago",
    "delta.one_minute" => "One minute ago",
    "delta.minutes" => "{0} minutes ago",
    "delta.one_hour" => "One hour ago",
    "delta.hours" => "{0} hours ago",
    "delta.one_day" => "One day ago",
    "delta.days" => "{0} days ago",
    "delta.one_week" => "One week ago",
    "delta.weeks" => "{0} weeks ago",
    "delta.one_month" => "One month ago",
    "delta.months" => "{0} months ago",
    "delta.one_year" => "One year ago",
    "delta.years" => "{0} years ago",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    /// locale → key → template
    locales: HashMap<String, HashMap<String, String>>,
    fallback: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl MessageCatalog {
    /// An empty catalog falling back to `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self { locales: HashMap::new(), fallback: fallback.into() }
    }

    /// A catalog holding the built-in English templates.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::default();
        for (key, template) in DEFAULT_MESSAGES.entries() {
            catalog.insert(DEFAULT_LOCALE, *key, *template);
        }
        catalog
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn insert(&mut self, locale: &str, key: impl Into<String>, template: impl Into<String>) {
        self.locales.entry(locale.to_string()).or_default().insert(key.into(), template.into());
    }

    /// Load `key = value` lines for `locale`. Blank lines and lines starting
    /// with `#` or `!` are skipped. Nothing is inserted if any line is
    /// malformed. Returns the number of entries loaded.
    pub fn load_properties(&mut self, locale: &str, text: &str) -> Result<usize, CatalogError> {
        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let (key, value) = trimmed
                .split_once('=')
                .ok_or_else(|| CatalogError::MalformedLine { line: line_no, text: line.to_string() })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CatalogError::EmptyKey { line: line_no });
            }
            entries.push((key, value.trim()));
        }
        let count = entries.len();
        for (key, value) in entries {
            self.insert(locale, key, value);
        }
        debug!("loaded {count} message(s) for locale {locale}");
        Ok(count)
    }

    /// Resolve the raw template for `key`, following the fallback chain.
    pub fn template(&self, locale: &str, key: &str) -> Option<&str> {
        let language = locale.split(['-', '_']).next().unwrap_or(locale);
        [locale, language, self.fallback.as_str()]
            .into_iter()
            .find_map(|candidate| self.locales.get(candidate)?.get(key))
            .map(String::as_str)
    }

    /// Resolve and format the message for `key`. Unknown keys format as the
    /// key itself.
    pub fn message(&self, locale: &str, key: &str, args: &[&dyn fmt::Display]) -> String {
        match self.template(locale, key) {
            Some(template) => format(template, args),
            None => {
                debug!("no message for {key:?} in {locale}");
                format(key, args)
            }
        }
    }
}

/// Substitute positional placeholders.
///
/// `{{` and `}}` stand for literal braces; placeholders with no matching
/// argument, or that are not placeholders at all, are kept verbatim.
///
/// ```
/// use strparse_core::messages::format;
///
/// assert_eq!(format("{0} of {1} {{done}} {7}", &[&3, &"five"]), "3 of five {done} {7}");
/// ```
pub fn format(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if let Some(tail) = rest.strip_prefix("{{") {
            out.push('{');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("}}") {
            out.push('}');
            rest = tail;
        } else if let Some(close) = rest.find('}').filter(|_| rest.starts_with('{')) {
            let arg = rest[1..close].parse::<usize>().ok().and_then(|n| args.get(n));
            match arg {
                Some(arg) => {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{arg}");
                }
                None => out.push_str(&rest[..=close]),
            }
            rest = &rest[close + 1..];
        } else {
            out.push_str(&rest[..1]);
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}
