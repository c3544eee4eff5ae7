use log::{debug, info, warn};

use super::types::{format_value, header_samples, OtuRow, RowShape, TableLine, OTU_HEADER_MARKER};
use crate::error::Result;

enum Materialized {
    Verbatim(String),
    Row {
        id: String,
        values: Vec<f64>,
        lineage: String,
    },
}

/// Per-sample column totals of raw counts.
///
/// A column whose total is zero maps every value to `0.0`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnTotals {
    totals: Vec<f64>,
}

impl ColumnTotals {
    pub fn new() -> Self {
        ColumnTotals { totals: Vec::new() }
    }

    /// Add one row of raw values. Rows are expected to share one width.
    pub fn add(&mut self, values: &[f64]) {
        if self.totals.is_empty() {
            self.totals = vec![0.0; values.len()];
        }
        for (total, value) in self.totals.iter_mut().zip(values) {
            *total += value;
        }
    }

    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    /// Log a warning for every sample whose total is zero
    pub fn warn_zero_columns(&self, samples: &[String]) {
        for (col, total) in self.totals.iter().enumerate() {
            if *total == 0.0 {
                let name = samples
                    .get(col)
                    .cloned()
                    .unwrap_or_else(|| format!("column {}", col + 1));
                warn!("Sample {} has zero total abundance, reporting zeros", name);
            }
        }
    }

    /// Divide each value by the total of its column
    pub fn relative(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(&self.totals)
            .map(|(value, total)| if *total == 0.0 { 0.0 } else { value / total })
            .collect()
    }
}

/// Convert an OTU table to relative abundances.
///
/// Each sample column is divided by its total over all data rows, so every
/// column sums to 1.0 afterwards. Header, comment and blank lines are kept in
/// place and the identifier and lineage fields of each row are untouched.
/// A column whose total is zero is emitted as zeros.
///
/// Column totals are only known after the last row, so the whole table is
/// held in memory before the first line is returned. Summaries do not go
/// through this: they sum raw counts per taxon while streaming and divide
/// by [`ColumnTotals`] at the end, which keeps the sums independent of row
/// order.
pub fn normalize<I, S>(lines: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = Vec::new();
    let mut shape = RowShape::new();
    let mut samples: Vec<String> = Vec::new();
    let mut totals = ColumnTotals::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let line_no = idx + 1;

        match TableLine::classify(line, OTU_HEADER_MARKER) {
            TableLine::Header(header) => {
                samples = header_samples(header);
                shape.check(line_no, samples.len())?;
                table.push(Materialized::Verbatim(line.to_string()));
            }
            TableLine::Comment(_) | TableLine::Blank => {
                table.push(Materialized::Verbatim(line.to_string()));
            }
            TableLine::Data(data) => {
                let row = OtuRow::parse(data, line_no)?;
                shape.check(line_no, row.values.len())?;
                totals.add(&row.values);
                table.push(Materialized::Row {
                    id: row.id.to_string(),
                    values: row.values,
                    lineage: row.lineage.to_string(),
                });
            }
        }
    }

    totals.warn_zero_columns(&samples);
    debug!("Column totals: {:?}", totals.totals());

    let mut rows = 0;
    let output = table
        .into_iter()
        .map(|entry| match entry {
            Materialized::Verbatim(line) => line,
            Materialized::Row { id, values, lineage } => {
                rows += 1;
                let mut fields = Vec::with_capacity(values.len() + 2);
                fields.push(id);
                fields.extend(totals.relative(&values).into_iter().map(format_value));
                fields.push(lineage);
                fields.join("\t")
            }
        })
        .collect();

    info!(
        "Converted {} rows across {} samples to relative abundance",
        rows,
        totals.totals().len()
    );
    Ok(output)
}
