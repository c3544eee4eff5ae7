use serde::Serialize;

/// Label appended to lineages shorter than the requested level.
pub const OTHER_LABEL: &str = "Other";
/// Separator used to join ranks of a taxon key, independent of the input delimiter.
pub const TAXON_SEPARATOR: &str = ";";

/// Settings for one summarization run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryConfig {
    /// Number of lineage ranks kept in each taxon key
    pub level: usize,
    /// Separator between ranks in the input lineage field
    pub delimiter: String,
    /// Convert counts to per-sample fractions before aggregating
    pub relative_abundance: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        SummaryConfig {
            level: 2,
            delimiter: ";".to_string(),
            relative_abundance: true,
        }
    }
}

/// Non-data lines of the OTU table, in the order they were read
#[derive(Debug, Clone, PartialEq)]
pub enum Preamble {
    /// Position of the `#OTU ID` header line
    Header,
    Comment(String),
}

/// Summed abundances of one taxon, one value per sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonAbundance {
    pub taxon: String,
    pub values: Vec<f64>,
}

/// Result of aggregating an OTU table at a single lineage level
#[derive(Debug, Clone, PartialEq)]
pub struct TaxaSummary {
    /// Sample identifiers from the OTU header, in column order
    pub samples: Vec<String>,
    /// Whether the table carried an `#OTU ID` header line
    pub has_header: bool,
    pub preamble: Vec<Preamble>,
    /// Taxa sorted by key
    pub taxa: Vec<TaxonAbundance>,
    /// Number of data rows aggregated
    pub rows: usize,
}

impl TaxaSummary {
    pub fn taxon_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.taxa.iter().map(|t| t.taxon.as_str())
    }

    #[cfg(test)]
    pub fn get(&self, taxon: &str) -> Option<&[f64]> {
        self.taxa
            .binary_search_by(|t| t.taxon.as_str().cmp(taxon))
            .ok()
            .map(|idx| self.taxa[idx].values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> TaxaSummary {
        TaxaSummary {
            samples: vec!["S1".to_string()],
            has_header: true,
            preamble: vec![Preamble::Header],
            taxa: vec![
                TaxonAbundance {
                    taxon: "k__Archaea".to_string(),
                    values: vec![1.0],
                },
                TaxonAbundance {
                    taxon: "k__Bacteria".to_string(),
                    values: vec![2.0],
                },
            ],
            rows: 2,
        }
    }

    #[test]
    fn test_default_config() {
        let config = SummaryConfig::default();
        assert_eq!(config.level, 2);
        assert_eq!(config.delimiter, ";");
        assert!(config.relative_abundance);
    }

    #[test]
    fn test_summary_lookup() {
        let summary = summary();
        assert_eq!(summary.get("k__Bacteria"), Some(&[2.0][..]));
        assert_eq!(summary.get("k__Fungi"), None);
        assert_eq!(
            summary.taxon_names().collect::<Vec<_>>(),
            vec!["k__Archaea", "k__Bacteria"]
        );
    }
}
