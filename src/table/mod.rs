pub(crate) mod normalize;
pub(crate) mod types;

pub use normalize::{normalize, ColumnTotals};
pub use types::{
    format_value, header_samples, OtuRow, RowShape, TableLine, MAPPING_HEADER_MARKER,
    OTU_HEADER_MARKER,
};
