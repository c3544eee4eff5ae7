use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::info;

/// Line-oriented reader for tab-separated tables
pub struct TableReader {
    path: PathBuf,
}

impl TableReader {
    /// Create a new TableReader for the given file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TableReader {
            path: path.as_ref().to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Feed every line of the file to `callback`, line endings removed.
    /// Returns the number of lines read.
    pub fn process_lines<F>(&self, mut callback: F) -> Result<usize>
    where
        F: FnMut(&str) -> Result<()>
    {
        info!("Reading table: {}", self.path.display());

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))?;
        let reader = BufReader::new(file);

        let mut num_lines = 0;
        for line in reader.lines() {
            let line = line.with_context(|| {
                format!("Failed to read line {} of {}", num_lines + 1, self.path.display())
            })?;
            callback(line.strip_suffix('\r').unwrap_or(&line))?;
            num_lines += 1;
        }

        info!("Read {} lines from {}", num_lines, self.path.display());
        Ok(num_lines)
    }

    /// Read the whole file into memory
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.process_lines(|line| {
            lines.push(line.to_string());
            Ok(())
        })?;
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_process_lines() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("otu_table.txt");
        let mut file = File::create(&file_path)?;
        write!(file, "#OTU ID\tS1\tConsensus Lineage\r\nOTU1\t4\tk__Bacteria\n")?;

        let reader = TableReader::new(&file_path);
        let mut lines = Vec::new();
        let count = reader.process_lines(|line| {
            lines.push(line.to_string());
            Ok(())
        })?;

        assert_eq!(count, 2);
        assert_eq!(lines, vec!["#OTU ID\tS1\tConsensus Lineage", "OTU1\t4\tk__Bacteria"]);

        Ok(())
    }

    #[test]
    fn test_callback_error_stops_reading() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("otu_table.txt");
        let mut file = File::create(&file_path)?;
        writeln!(file, "a\nb\nc")?;

        let reader = TableReader::new(&file_path);
        let mut seen = 0;
        let result = reader.process_lines(|line| {
            seen += 1;
            if line == "b" {
                anyhow::bail!("stop at b");
            }
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(seen, 2);

        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let reader = TableReader::new("/nonexistent/otu_table.txt");
        let err = reader.read_lines().unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
        assert_eq!(reader.path(), Path::new("/nonexistent/otu_table.txt"));
    }
}
