//! Sectioned key/value configuration files.
//!
//! The on-disk format is the INI dialect BANG has always shipped with:
//!
//! ```text
//! [configuration]
//! baseunpackdirectory = /srv/bang/unpack
//! threads = 8
//! removescandirectory = yes
//!
//! [database]
//! dbconnectionerrorfatal = no
//! user: bang
//! ```
//!
//! A line indented deeper than the key line above it continues that key's
//! value, and blank lines inside such a value are kept. Keys themselves may be
//! indented. Values support `%%` for a literal percent sign and `%(name)s` for
//! the value of another key in the same section or in `[DEFAULT]`.
//!
//! Reading is strict per file and tolerant per field. Anything that keeps the
//! file from being read as a whole (I/O failure, a key outside a section, a
//! line with no delimiter, duplicate sections or keys) fails [`ConfigSource::load`].
//! Once loaded, the typed getters never fail: a missing key, a value that
//! does not coerce, or a value that does not interpolate is reported as `None`
//! and the caller keeps the value it already had.

use std::collections::HashMap;
use std::fs;
use std::iter;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::error::{OptionsError, ReadError};

/// Name of the section whose keys are visible from every other section.
const DEFAULT_SECTION: &str = "DEFAULT";

/// How many `%(name)s` references may nest before a value is given up on.
const MAX_INTERPOLATION_DEPTH: usize = 10;

type Section = HashMap<String, String>;

#[derive(Debug, Error)]
enum InterpolationError {
    #[error("'%' must be followed by '%' or '(', found: {0:?}")]
    BadSyntax(String),
    #[error("bad interpolation variable reference {0:?}")]
    BadReference(String),
    #[error("no key {0:?} to interpolate")]
    MissingKey(String),
    #[error("references nested too deeply")]
    TooDeep,
}

/// A parsed configuration file: `(section, key) -> raw string`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    sections: HashMap<String, Section>,
    defaults: Section,
}

impl ConfigSource {
    /// Read and parse the file at `path`.
    ///
    /// Every failure maps to [`OptionsError::ConfigUnreadable`]; the underlying
    /// cause is kept as the error source.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let unreadable = |source: ReadError| OptionsError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let content = fs::read_to_string(path).map_err(|e| unreadable(e.into()))?;
        let source = Self::parse(&content).map_err(unreadable)?;
        debug!(
            path = %path.display(),
            sections = source.sections.len(),
            "loaded configuration file"
        );
        Ok(source)
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self, ReadError> {
        let mut source = ConfigSource::default();
        let mut current: Option<String> = None;
        // The key whose value is still open, and the indent of its line.
        let mut open: Option<(String, usize)> = None;

        for (i, raw) in content.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim();

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            if trimmed.is_empty() {
                if let (Some(section), Some((key, _))) = (&current, &open)
                    && let Some(value) = source.section_mut(section).get_mut(key)
                {
                    value.push('\n');
                }
                continue;
            }

            let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
            if let (Some(section), Some((key, key_indent))) = (&current, &open)
                && indent > *key_indent
                && let Some(value) = source.section_mut(section).get_mut(key)
            {
                value.push('\n');
                value.push_str(trimmed);
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| ReadError::Syntax {
                    line,
                    reason: "unterminated section header".into(),
                })?;
                if name.is_empty() {
                    return Err(ReadError::Syntax {
                        line,
                        reason: "empty section name".into(),
                    });
                }
                if name != DEFAULT_SECTION && source.sections.contains_key(name) {
                    return Err(ReadError::Syntax {
                        line,
                        reason: format!("duplicate section '{name}'"),
                    });
                }
                if name != DEFAULT_SECTION {
                    source.sections.insert(name.to_string(), Section::new());
                }
                current = Some(name.to_string());
                open = None;
                continue;
            }

            let Some(section) = &current else {
                return Err(ReadError::Syntax {
                    line,
                    reason: "key outside of any section header".into(),
                });
            };

            let split = trimmed.find(['=', ':']).ok_or_else(|| ReadError::Syntax {
                line,
                reason: format!("expected `key = value`, found '{trimmed}'"),
            })?;
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(ReadError::Syntax {
                    line,
                    reason: "empty key".into(),
                });
            }

            let entries = source.section_mut(section);
            if entries.contains_key(&key) {
                return Err(ReadError::Syntax {
                    line,
                    reason: format!("duplicate key '{key}' in section '{section}'"),
                });
            }
            entries.insert(key.clone(), value);
            open = Some((key, indent));
        }

        // Blank lines after the last continuation belong to no value.
        for value in source
            .sections
            .values_mut()
            .chain(iter::once(&mut source.defaults))
            .flat_map(|entries| entries.values_mut())
        {
            value.truncate(value.trim_end().len());
        }

        Ok(source)
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }

    /// Whether the file has a `[section]` header. `[DEFAULT]` is not counted.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Value at `(section, key)` before interpolation. Keys are
    /// case-insensitive; `[DEFAULT]` supplies values for sections that exist
    /// but lack the key.
    fn get_raw(&self, section: &str, key: &str) -> Option<&str> {
        let entries = self.sections.get(section)?;
        let key = key.to_lowercase();
        entries
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }

    /// Value at `(section, key)` with `%%` and `%(name)s` expanded. A value
    /// whose interpolation fails is treated the same as a missing key.
    pub fn get_string(&self, section: &str, key: &str) -> Option<String> {
        let raw = self.get_raw(section, key)?;
        match self.interpolate(section, raw, 1) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(section, key, error = %e, "ignoring value that does not interpolate");
                None
            }
        }
    }

    fn interpolate(
        &self,
        section: &str,
        raw: &str,
        depth: usize,
    ) -> Result<String, InterpolationError> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(InterpolationError::TooDeep);
        }
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(at) = rest.find('%') {
            out.push_str(&rest[..at]);
            let tail = &rest[at + 1..];
            if let Some(after) = tail.strip_prefix('%') {
                out.push('%');
                rest = after;
            } else if let Some(reference) = tail.strip_prefix('(') {
                let (name, after) = reference
                    .split_once(')')
                    .filter(|(name, _)| !name.is_empty())
                    .and_then(|(name, after)| Some((name, after.strip_prefix('s')?)))
                    .ok_or_else(|| InterpolationError::BadReference(rest[at..].to_string()))?;
                let value = self
                    .get_raw(section, name)
                    .ok_or_else(|| InterpolationError::MissingKey(name.to_lowercase()))?;
                if value.contains('%') {
                    out.push_str(&self.interpolate(section, value, depth + 1)?);
                } else {
                    out.push_str(value);
                }
                rest = after;
            } else {
                return Err(InterpolationError::BadSyntax(rest[at..].to_string()));
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Value at `(section, key)` parsed as an integer. Text that is not an
    /// integer is treated the same as a missing key.
    pub fn get_integer(&self, section: &str, key: &str) -> Option<i64> {
        let raw = self.get_string(section, key)?;
        // Plain decimal within i64 only: `4_000` and wider values are not integers here.
        match raw.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(section, key, value = %raw, error = %e, "ignoring non-integer value");
                None
            }
        }
    }

    /// Value at `(section, key)` as a flag: exactly `yes` is true, any other
    /// present value is false.
    pub fn get_boolean(&self, section: &str, key: &str) -> Option<bool> {
        self.get_string(section, key).map(|v| v == "yes")
    }
}
