use crate::error::{Result, SummaryError};

/// Marker of the column-header line of an OTU table.
pub const OTU_HEADER_MARKER: &str = "#OTU ID";
/// Marker of the column-header line of a category mapping table.
pub const MAPPING_HEADER_MARKER: &str = "#SampleID";
/// Leading character of every non-data line.
pub const COMMENT_MARKER: char = '#';

/// Role of a single line within a tab-separated table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLine<'a> {
    Header(&'a str),
    Comment(&'a str),
    Blank,
    Data(&'a str),
}

impl<'a> TableLine<'a> {
    /// Classify a line given the header marker of the table it belongs to.
    /// The header marker is checked before the generic comment marker.
    pub fn classify(line: &'a str, header_marker: &str) -> Self {
        if line.starts_with(header_marker) {
            TableLine::Header(line)
        } else if line.starts_with(COMMENT_MARKER) {
            TableLine::Comment(line)
        } else if line.trim().is_empty() {
            TableLine::Blank
        } else {
            TableLine::Data(line)
        }
    }
}

/// A parsed OTU table data row: `id <tab> v1 .. vN <tab> lineage`.
#[derive(Debug, Clone, PartialEq)]
pub struct OtuRow<'a> {
    pub id: &'a str,
    pub values: Vec<f64>,
    pub lineage: &'a str,
}

impl<'a> OtuRow<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            return Err(SummaryError::Parse {
                line: line_no,
                fields: fields.len(),
            });
        }

        let last = fields.len() - 1;
        let values = fields[1..last]
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                raw.trim().parse::<f64>().map_err(|_| SummaryError::Numeric {
                    value: raw.to_string(),
                    line: line_no,
                    column: idx + 2,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(OtuRow {
            id: fields[0],
            values,
            lineage: fields[last],
        })
    }
}

/// Sample identifiers of an OTU header line, i.e. every column except the
/// leading identifier column and the trailing lineage column.
pub fn header_samples(header: &str) -> Vec<String> {
    let fields: Vec<&str> = header.trim().split('\t').collect();
    if fields.len() < 2 {
        return Vec::new();
    }
    fields[1..fields.len() - 1]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Render an abundance value. Integral values keep a trailing `.0` and
/// fractions use the shortest digits that parse back exactly, always in
/// plain decimal notation (`0.00003`, never `3e-5`).
pub fn format_value(value: f64) -> String {
    let repr = format!("{:?}", value);
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return repr;
    };
    let Ok(exponent) = exponent.parse::<i64>() else {
        return repr;
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{}{}", int_part, frac_part);
    // position of the decimal point within `digits`
    let point = int_part.len() as i64 + exponent;

    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    };
    format!("{}{}", sign, body)
}

/// Tracks the number of sample values every row of a table must carry.
///
/// The width is taken from the header line or the first data row, whichever
/// comes first, and every later row is checked against it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RowShape {
    width: Option<usize>,
}

impl RowShape {
    pub fn new() -> Self {
        RowShape { width: None }
    }

    #[cfg(test)]
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn check(&mut self, line_no: usize, actual: usize) -> Result<()> {
        match self.width {
            Some(expected) if expected != actual => Err(SummaryError::ShapeMismatch {
                line: line_no,
                expected,
                actual,
            }),
            Some(_) => Ok(()),
            None => {
                self.width = Some(actual);
                Ok(())
            }
        }
    }
}
