//! Final report: sorting, percentages, and human/JSON rendering.
//!
//! One line per package, ascending by own size (ties broken by name so
//! two runs over the same host print identically), with own and
//! transitive footprints plus their share of the total. Percentages are
//! computed against the sum of all own sizes, so a thin metapackage can
//! legitimately show a near-zero own share next to a transitive share
//! covering most of the system.

use std::io::{self, Write};

use debdu_graph::SizeEntry;
use serde::Serialize;

/// One rendered report line.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Package name.
    pub name: String,
    /// Own footprint (KiB).
    pub own_size: u64,
    /// Own footprint as a share of the catalog total.
    pub own_percent: f64,
    /// Own plus transitive dependency footprint (KiB).
    pub transitive_size: u64,
    /// Transitive footprint as a share of the catalog total.
    pub transitive_percent: f64,
}

/// The assembled report for one run.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Sum of all own sizes in the catalog (KiB); percentage basis.
    pub total_own_size: u64,
    /// Rows ascending by own size.
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Assemble the report from the aggregator's entries.
    ///
    /// With `top = Some(n)`, only the `n` largest rows (by own size)
    /// survive; ordering stays ascending so the biggest consumers end
    /// up at the bottom of the terminal, nearest the prompt.
    #[must_use]
    pub fn assemble(mut entries: Vec<SizeEntry>, top: Option<usize>) -> Self {
        entries.sort_by(|a, b| {
            a.own_size
                .cmp(&b.own_size)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total_own_size: u64 = entries.iter().map(|e| e.own_size).sum();

        let mut rows: Vec<ReportRow> = entries
            .into_iter()
            .map(|entry| ReportRow {
                own_percent: percent_of(entry.own_size, total_own_size),
                transitive_percent: percent_of(entry.transitive_size, total_own_size),
                name: entry.name,
                own_size: entry.own_size,
                transitive_size: entry.transitive_size,
            })
            .collect();

        if let Some(n) = top {
            let skip = rows.len().saturating_sub(n);
            rows.drain(..skip);
        }

        Self {
            total_own_size,
            rows,
        }
    }

    /// Write the human-readable listing.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Package OwnSize Percent SizeWithDeps Percent:")?;
        for row in &self.rows {
            writeln!(
                w,
                "{} {} {:.2}% {} {:.2}%",
                row.name, row.own_size, row.own_percent, row.transitive_size,
                row.transitive_percent
            )?;
        }
        Ok(())
    }

    /// Write the report as one JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn render_json(&self, w: &mut dyn Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(w, self)
    }
}

/// Percentage of `part` against `total`, zero for an empty catalog.
#[allow(clippy::cast_precision_loss)]
fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
