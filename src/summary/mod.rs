pub(crate) mod accumulator;
pub(crate) mod formatter;
pub(crate) mod types;

pub use accumulator::{aggregate, Aggregator};
pub use formatter::{format_json, format_summary, merge_into_mapping};
pub use types::{SummaryConfig, TaxaSummary};
