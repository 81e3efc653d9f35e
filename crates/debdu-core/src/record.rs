//! Status-stanza parsing into package records.
//!
//! # Input Shape
//!
//! `dpkg-query --status` emits one RFC822-like stanza per package,
//! stanzas separated by blank lines:
//!
//! ```text
//! Package: libfoo1
//! Status: install ok installed
//! Installed-Size: 412
//! Replaces: libfoo0
//! Provides: libfoo
//! Depends: libc6 (>= 2.34), libbar2 | libbar2-compat, python3:any
//! Description: example library
//! ```
//!
//! The parser is a line-oriented stateful scan: a stanza opens at a
//! `Package: ` line and closes at the first blank line or end of input
//! (a trailing blank line and an abrupt EOF both close the final stanza).
//! Only the five recognized field prefixes populate the record; every
//! other line is skipped.
//!
//! # Invariants
//!
//! - `Replaces`/`Provides`/`Depends` values are `", "`-delimited lists;
//!   a stanza without them yields empty sets, never absent fields.
//! - Each `Depends` entry is truncated at the first space or colon, so
//!   version constraints (`libc6 (>= 2.34)`), architecture qualifiers
//!   (`python3:any`), and alternative lists (`a | b`, keeping the first
//!   alternative) all reduce to one bare package name.
//! - `Installed-Size` must be present and numeric. A stanza that closes
//!   without one is a data-integrity failure: emitting size 0 instead
//!   would silently corrupt every downstream aggregate.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;

// ---------------------------------------------------------------------------
// Field prefixes
// ---------------------------------------------------------------------------

const PACKAGE_PREFIX: &str = "Package: ";
const SIZE_PREFIX: &str = "Installed-Size: ";
const REPLACES_PREFIX: &str = "Replaces: ";
const PROVIDES_PREFIX: &str = "Provides: ";
const DEPENDS_PREFIX: &str = "Depends: ";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while parsing status stanzas.
///
/// Both variants are fatal: a package without a usable installed size
/// cannot participate in size accounting, and partial aggregates would
/// be worse than no report.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A stanza closed without an `Installed-Size` line.
    #[error("no Installed-Size recorded for package `{package}`")]
    MissingSize {
        /// Name of the offending package.
        package: String,
    },

    /// An `Installed-Size` value failed to parse as a non-negative integer.
    #[error("invalid Installed-Size `{value}` for package `{package}`")]
    InvalidSize {
        /// Name of the offending package.
        package: String,
        /// The raw value as found in the stanza.
        value: String,
    },
}

// ---------------------------------------------------------------------------
// PackageRecord
// ---------------------------------------------------------------------------

/// One package's parsed facts, immutable once built.
///
/// `installed_size` is in the unit dpkg reports (kibibytes). The three
/// name sets hold bare package names; `depends` entries have version and
/// architecture qualifiers already stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    /// Package name, unique key within one catalog.
    pub name: String,
    /// On-disk footprint as reported by dpkg (KiB).
    pub installed_size: u64,
    /// Names this package supersedes.
    pub replaces: BTreeSet<String>,
    /// Virtual names this package offers.
    pub provides: BTreeSet<String>,
    /// Bare names of direct dependencies.
    pub depends: BTreeSet<String>,
}

/// In-progress stanza state; becomes a [`PackageRecord`] on stanza close.
#[derive(Debug)]
struct PartialRecord {
    name: String,
    installed_size: Option<u64>,
    replaces: BTreeSet<String>,
    provides: BTreeSet<String>,
    depends: BTreeSet<String>,
}

impl PartialRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            installed_size: None,
            replaces: BTreeSet::new(),
            provides: BTreeSet::new(),
            depends: BTreeSet::new(),
        }
    }

    /// Close the stanza, enforcing the installed-size invariant.
    fn close(self) -> Result<PackageRecord, ParseError> {
        let installed_size = self
            .installed_size
            .ok_or(ParseError::MissingSize { package: self.name.clone() })?;
        Ok(PackageRecord {
            name: self.name,
            installed_size,
            replaces: self.replaces,
            provides: self.provides,
            depends: self.depends,
        })
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one batch of `dpkg-query --status` output into package records.
///
/// Records are returned in stanza order. Lines outside any stanza (before
/// the first `Package: ` line) are ignored, as are unrecognized fields
/// inside a stanza.
///
/// # Errors
///
/// Returns [`ParseError`] if any stanza closes without a parsable
/// `Installed-Size` value.
pub fn parse_status(text: &str) -> Result<Vec<PackageRecord>, ParseError> {
    let mut records = Vec::new();
    let mut current: Option<PartialRecord> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            if let Some(partial) = current.take() {
                records.push(partial.close()?);
            }
            continue;
        }

        if let Some(name) = line.strip_prefix(PACKAGE_PREFIX) {
            // dpkg always separates stanzas with a blank line, but close
            // a still-open stanza anyway so malformed input cannot merge
            // two packages into one record.
            if let Some(partial) = current.take() {
                records.push(partial.close()?);
            }
            trace!(package = name, "stanza open");
            current = Some(PartialRecord::new(name.trim()));
            continue;
        }

        let Some(partial) = current.as_mut() else {
            continue;
        };

        if let Some(value) = line.strip_prefix(SIZE_PREFIX) {
            let value = value.trim();
            let size = value.parse::<u64>().map_err(|_| ParseError::InvalidSize {
                package: partial.name.clone(),
                value: value.to_string(),
            })?;
            partial.installed_size = Some(size);
        } else if let Some(value) = line.strip_prefix(REPLACES_PREFIX) {
            partial.replaces = split_name_list(value);
        } else if let Some(value) = line.strip_prefix(PROVIDES_PREFIX) {
            partial.provides = split_name_list(value);
        } else if let Some(value) = line.strip_prefix(DEPENDS_PREFIX) {
            partial.depends = split_depends_list(value);
        }
    }

    // Abrupt end of input closes the final stanza.
    if let Some(partial) = current.take() {
        records.push(partial.close()?);
    }

    Ok(records)
}

/// Split a `", "`-delimited field value into a name set.
fn split_name_list(value: &str) -> BTreeSet<String> {
    value
        .split(", ")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Split a `Depends` value, truncating each entry at the first space or
/// colon to leave a bare package name.
fn split_depends_list(value: &str) -> BTreeSet<String> {
    value
        .split(", ")
        .filter_map(|entry| entry.split([' ', ':']).next())
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
