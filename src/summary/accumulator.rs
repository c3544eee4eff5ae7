use fxhash::FxHashMap;
use log::{debug, info};

use super::types::{
    Preamble, SummaryConfig, TaxaSummary, TaxonAbundance, OTHER_LABEL, TAXON_SEPARATOR,
};
use crate::error::Result;
use crate::table::{
    header_samples, ColumnTotals, OtuRow, RowShape, TableLine, OTU_HEADER_MARKER,
};

/// Build the taxon key of a lineage at the given level.
///
/// Ranks are split on `delimiter`, the first `level` are kept and trimmed,
/// and the result is joined with `;`. A lineage with fewer than `level`
/// ranks gets a single `Other` appended, however many ranks are missing.
pub fn truncate_lineage(lineage: &str, delimiter: &str, level: usize) -> String {
    let mut ranks: Vec<&str> = lineage
        .split(delimiter)
        .take(level)
        .map(str::trim)
        .collect();
    if ranks.len() < level {
        ranks.push(OTHER_LABEL);
    }
    ranks.join(TAXON_SEPARATOR)
}

/// Running per-taxon sums. All vectors share the width of the first one inserted.
#[derive(Debug, Default)]
pub struct TaxonAccumulator {
    totals: FxHashMap<String, Vec<f64>>,
    shape: RowShape,
}

impl TaxonAccumulator {
    pub fn new() -> Self {
        TaxonAccumulator {
            totals: FxHashMap::default(),
            shape: RowShape::new(),
        }
    }

    /// Add `values` into the vector of `taxon`, inserting it if unseen.
    pub fn add(&mut self, taxon: String, values: Vec<f64>, line_no: usize) -> Result<()> {
        self.shape.check(line_no, values.len())?;
        match self.totals.get_mut(&taxon) {
            Some(sums) => {
                for (sum, value) in sums.iter_mut().zip(values) {
                    *sum += value;
                }
            }
            None => {
                self.totals.insert(taxon, values);
            }
        }
        Ok(())
    }

    /// Require every vector to have `width` values; used once the header is known.
    pub fn expect_width(&mut self, line_no: usize, width: usize) -> Result<()> {
        self.shape.check(line_no, width)
    }

    #[cfg(test)]
    pub fn get(&self, taxon: &str) -> Option<&[f64]> {
        self.totals.get(taxon).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Consume the accumulator, returning taxa sorted by key
    pub fn into_sorted(self) -> Vec<TaxonAbundance> {
        let mut taxa: Vec<TaxonAbundance> = self
            .totals
            .into_iter()
            .map(|(taxon, values)| TaxonAbundance { taxon, values })
            .collect();
        taxa.sort_by(|a, b| a.taxon.cmp(&b.taxon));
        taxa
    }
}

/// Streaming aggregation of an OTU table, fed one line at a time.
///
/// Raw counts are summed per taxon. With relative abundance enabled, each
/// taxon's sums are divided by the sample column totals in [`finish`], so the
/// result does not depend on the order rows arrive in.
///
/// [`finish`]: Aggregator::finish
pub struct Aggregator<'a> {
    config: &'a SummaryConfig,
    accumulator: TaxonAccumulator,
    column_totals: ColumnTotals,
    samples: Vec<String>,
    has_header: bool,
    preamble: Vec<Preamble>,
    line_no: usize,
    rows: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a SummaryConfig) -> Self {
        Aggregator {
            config,
            accumulator: TaxonAccumulator::new(),
            column_totals: ColumnTotals::new(),
            samples: Vec::new(),
            has_header: false,
            preamble: Vec::new(),
            line_no: 0,
            rows: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;

        match TableLine::classify(line, OTU_HEADER_MARKER) {
            TableLine::Header(header) => {
                self.samples = header_samples(header);
                self.accumulator
                    .expect_width(self.line_no, self.samples.len())?;
                self.has_header = true;
                self.preamble.push(Preamble::Header);
            }
            TableLine::Comment(comment) => {
                self.preamble.push(Preamble::Comment(comment.to_string()));
            }
            TableLine::Blank => {
                debug!("Skipping blank line {}", self.line_no);
            }
            TableLine::Data(data) => {
                let row = OtuRow::parse(data, self.line_no)?;
                let taxon =
                    truncate_lineage(row.lineage, &self.config.delimiter, self.config.level);
                self.column_totals.add(&row.values);
                self.accumulator.add(taxon, row.values, self.line_no)?;
                self.rows += 1;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> TaxaSummary {
        info!(
            "Aggregated {} rows into {} taxa at level {}",
            self.rows,
            self.accumulator.len(),
            self.config.level
        );

        let mut taxa = self.accumulator.into_sorted();
        if self.config.relative_abundance {
            self.column_totals.warn_zero_columns(&self.samples);
            for taxon in &mut taxa {
                taxon.values = self.column_totals.relative(&taxon.values);
            }
        }

        TaxaSummary {
            samples: self.samples,
            has_header: self.has_header,
            preamble: self.preamble,
            taxa,
            rows: self.rows,
        }
    }
}

/// Aggregate a complete in-memory table.
pub fn aggregate<I, S>(lines: I, config: &SummaryConfig) -> Result<TaxaSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = Aggregator::new(config);
    for line in lines {
        aggregator.push_line(line.as_ref())?;
    }
    Ok(aggregator.finish())
}
