pub(crate) mod reader;
pub(crate) mod writer;

pub use reader::TableReader;
pub use writer::{open_output, write_lines};
