//! Upload policy: extension allow-list and size ceiling
//!
//! Both checks are stateless predicates over a single record. The extension
//! gate always runs first; a record that fails it never reaches the size gate.

use crate::outcome::RejectReason;
use crate::record::NotificationRecord;
use std::collections::BTreeSet;

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".pdf"];
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_OUTPUT_PREFIX: &str = "output/";

const SUMMARY_SUFFIX: &str = ".json";

/// Validation rules applied to every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    allowed_extensions: BTreeSet<String>,
    max_size_bytes: u64,
    output_prefix: String,
}

/// Everything derived from a record that passed both checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Lowercase extension including the dot, e.g. `.png`
    pub extension: String,
    pub output_key: String,
}

impl FilterPolicy {
    /// Build a policy. Extensions are matched case-insensitively, so they are
    /// stored lowercase.
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: u64, output_prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().to_lowercase())
                .collect(),
            max_size_bytes,
            output_prefix: output_prefix.to_string(),
        }
    }

    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(extension)
    }

    /// Run the extension gate, then the size gate.
    pub fn check(&self, record: &NotificationRecord) -> Result<Accepted, RejectReason> {
        let extension = file_extension(&record.key);
        if !self.is_allowed_extension(&extension) {
            return Err(RejectReason::ExtensionNotAllowed { extension });
        }

        if record.size > self.max_size_bytes {
            return Err(RejectReason::TooLarge {
                size: record.size,
                max: self.max_size_bytes,
            });
        }

        Ok(Accepted {
            extension,
            output_key: self.output_key(&record.key),
        })
    }

    /// `<prefix><basename(key)>.json`
    pub fn output_key(&self, key: &str) -> String {
        format!("{}{}{}", self.output_prefix, file_name(key), SUMMARY_SUFFIX)
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOWED_EXTENSIONS,
            DEFAULT_MAX_SIZE_BYTES,
            DEFAULT_OUTPUT_PREFIX,
        )
    }
}

/// Final path segment of an object key (the whole key when it has no `/`).
pub fn file_name(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}

/// Lowercase extension of the key's file name, dot included; empty when the
/// name has none. Leading dots belong to the name, so `.png` and `..png`
/// have no extension.
pub fn file_extension(key: &str) -> String {
    let name = file_name(key);
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(pos) => name[stem_start + pos..].to_lowercase(),
        None => String::new(),
    }
}
