//! Package source seam and the batch query driver.
//!
//! # Overview
//!
//! The operating-system collaborators (listing installed packages,
//! querying status stanzas) sit behind the [`PackageSource`] trait so
//! the driver can be exercised against in-memory fixtures. The driver
//! itself, [`load_catalog`], partitions the installed-name stream into
//! batches, parses each batch's stanza text, and unions the records
//! into one [`Catalog`] keyed by name.
//!
//! # Batching
//!
//! Status queries pass package names on the command line, so one query
//! per installed package would be slow and one query for all of them
//! risks the kernel's argument-length limit. [`DEFAULT_BATCH_SIZE`]
//! (100 names) stays comfortably under typical limits; for N names the
//! driver issues `ceil(N / batch_size)` queries.
//!
//! # Failure Policy
//!
//! - An empty installed list is a legitimate empty catalog, not an error.
//! - A name whose stanza never appears in the query output is simply
//!   absent from the catalog; downstream treats it as unknown.
//! - A stanza without a parsable `Installed-Size` aborts the run
//!   (see [`crate::record::ParseError`]).

use std::collections::BTreeMap;
use std::io;

use tracing::{debug, instrument};

use crate::record::{ParseError, PackageRecord, parse_status};

/// Maximum number of package names passed to one status query.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// The full set of parsed records for one run, keyed by package name.
///
/// A `BTreeMap` keeps iteration order stable within a run, which in turn
/// keeps diagnostics and graph construction reproducible.
pub type Catalog = BTreeMap<String, PackageRecord>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by a [`PackageSource`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O failure talking to the source.
    #[error("package source I/O error: {0}")]
    Io(#[from] io::Error),

    /// The underlying command ran but reported failure.
    #[error("`{command}` failed: {details}")]
    Command {
        /// The command that failed.
        command: String,
        /// Exit status and/or captured stderr.
        details: String,
    },
}

/// Errors raised while building the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The package source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A status stanza was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ---------------------------------------------------------------------------
// PackageSource
// ---------------------------------------------------------------------------

/// External collaborator seam: lists installed packages and answers
/// status queries for batches of them.
pub trait PackageSource {
    /// Names of currently installed packages, one per entry, in the
    /// order the source reports them. An empty list is valid.
    fn list_installed(&self) -> Result<Vec<String>, SourceError>;

    /// Raw status-stanza text covering `names`. Stanzas for names the
    /// source does not know may simply be missing from the output.
    fn query_status(&self, names: &[String]) -> Result<String, SourceError>;
}

// ---------------------------------------------------------------------------
// Batch query driver
// ---------------------------------------------------------------------------

/// Build the full catalog by querying `source` in batches of at most
/// `batch_size` names.
///
/// A `batch_size` of zero is treated as one name per batch.
///
/// # Errors
///
/// Returns [`CatalogError`] if the source fails or any stanza is
/// malformed (missing installed size).
#[instrument(skip(source))]
pub fn load_catalog<S: PackageSource>(
    source: &S,
    batch_size: usize,
) -> Result<Catalog, CatalogError> {
    let names = source.list_installed()?;
    debug!(installed = names.len(), "listed installed packages");

    let mut catalog = Catalog::new();
    for batch in names.chunks(batch_size.max(1)) {
        let text = source.query_status(batch)?;
        let records = parse_status(&text)?;
        debug!(requested = batch.len(), parsed = records.len(), "batch queried");
        for record in records {
            catalog.insert(record.name.clone(), record);
        }
    }

    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
