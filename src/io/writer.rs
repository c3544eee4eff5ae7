use std::path::Path;
use std::fs::File;
use std::io::{BufWriter, Write};
use anyhow::{Result, Context};
use log::info;

/// Open the output sink: the given file, or stdout when no path is set
pub fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };
    Ok(writer)
}

/// Write each line followed by a newline, then flush
pub fn write_lines<W: Write + ?Sized>(writer: &mut W, lines: &[String]) -> Result<usize> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    info!("Wrote {} lines", lines.len());
    Ok(lines.len())
}
