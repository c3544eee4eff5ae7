use fxhash::FxHashMap;
use log::{debug, info};
use serde::Serialize;

use super::types::{Preamble, TaxaSummary, TaxonAbundance};
use crate::error::{Result, SummaryError};
use crate::table::{format_value, TableLine, MAPPING_HEADER_MARKER};

/// Name of the first column of a standalone summary
pub const TAXON_COLUMN: &str = "Taxon";

/// Render the summary as a table with one row per taxon.
///
/// The OTU header becomes `Taxon<tab>samples..` and comment lines are kept,
/// both in their original order; sorted taxon rows follow.
pub fn format_summary(summary: &TaxaSummary) -> Vec<String> {
    let mut output = Vec::with_capacity(summary.preamble.len() + summary.taxa.len());

    for entry in &summary.preamble {
        match entry {
            Preamble::Header => {
                let mut header = vec![TAXON_COLUMN];
                header.extend(summary.samples.iter().map(String::as_str));
                output.push(header.join("\t"));
            }
            Preamble::Comment(line) => output.push(line.clone()),
        }
    }

    for taxon in &summary.taxa {
        let mut fields = Vec::with_capacity(taxon.values.len() + 1);
        fields.push(taxon.taxon.clone());
        fields.extend(taxon.values.iter().map(|v| format_value(*v)));
        output.push(fields.join("\t"));
    }

    output
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    level: usize,
    samples: &'a [String],
    taxa: &'a [TaxonAbundance],
}

/// Render the summary as pretty-printed JSON
pub fn format_json(summary: &TaxaSummary, level: usize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonSummary {
        level,
        samples: &summary.samples,
        taxa: &summary.taxa,
    })
}

/// Append one column per taxon to a category mapping table.
///
/// Rows whose sample identifier does not appear in the OTU table are left out
/// of the output; every other row keeps its position and gains the abundance
/// of each taxon for that sample, in sorted taxon order.
pub fn merge_into_mapping<I, S>(summary: &TaxaSummary, mapping: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !summary.has_header {
        return Err(SummaryError::MissingHeader(
            "OTU table has no '#OTU ID' line to take sample identifiers from".to_string(),
        ));
    }

    let mut sample_index: FxHashMap<&str, usize> = FxHashMap::default();
    for (idx, sample) in summary.samples.iter().enumerate() {
        sample_index.entry(sample.as_str()).or_insert(idx);
    }

    let mut output = Vec::new();
    let mut kept = 0;
    let mut dropped = 0;

    for line in mapping {
        let line = line.as_ref();
        match TableLine::classify(line, MAPPING_HEADER_MARKER) {
            TableLine::Header(header) => {
                let mut fields: Vec<&str> = header.trim().split('\t').collect();
                fields.extend(summary.taxon_names());
                output.push(fields.join("\t"));
            }
            TableLine::Comment(comment) => output.push(comment.to_string()),
            TableLine::Blank => {}
            TableLine::Data(data) => {
                let mut fields: Vec<String> =
                    data.trim().split('\t').map(str::to_string).collect();
                let sample = fields[0].as_str();
                let Some(&idx) = sample_index.get(sample) else {
                    debug!("Sample {} is not in the OTU table, leaving it out", sample);
                    dropped += 1;
                    continue;
                };
                fields.extend(summary.taxa.iter().map(|t| format_value(t.values[idx])));
                output.push(fields.join("\t"));
                kept += 1;
            }
        }
    }

    info!(
        "Merged {} taxa into {} mapping rows ({} samples not in OTU table)",
        summary.taxa.len(),
        kept,
        dropped
    );
    Ok(output)
}
