//! CSV-backed sheet
//!
//! The whole file is loaded into an in-memory grid. Ragged rows are accepted
//! on read; on persist every row is padded to the sheet width and written to
//! a sibling temp file which then replaces the target.

use super::{CellRef, Extent, Sheet};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvSheet {
    grid: Vec<Vec<String>>,
    /// Where `persist` writes (the source file unless redirected)
    target: PathBuf,
}

impl CsvSheet {
    /// Load a CSV file; writes go back to the same file
    ///
    /// Blank lines are kept as empty rows so row numbers match the file.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_slice());

        let mut grid: Vec<Vec<String>> = Vec::new();
        let mut record = csv::StringRecord::new();
        let mut consumed = 0;
        loop {
            let blank = skipped_blank_lines(&content, consumed);
            if !reader.read_record(&mut record)? {
                break;
            }
            grid.extend(std::iter::repeat_with(Vec::new).take(blank));
            grid.push(record.iter().map(str::to_string).collect());
            consumed = reader.position().byte() as usize;
        }

        debug!(path = %path.display(), rows = grid.len(), "Loaded CSV sheet");

        Ok(Self {
            grid,
            target: path.to_path_buf(),
        })
    }

    /// Build a sheet from rows in memory, persisting to `target`
    pub fn from_rows(rows: Vec<Vec<String>>, target: PathBuf) -> Self {
        Self { grid: rows, target }
    }

    /// Persist to a different file instead of overwriting the source
    pub fn redirect(mut self, target: PathBuf) -> Self {
        self.target = target;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    fn width(&self) -> usize {
        self.grid
            .iter()
            .map(|row| {
                row.iter()
                    .rposition(|cell| !cell.is_empty())
                    .map_or(0, |i| i + 1)
            })
            .max()
            .unwrap_or(0)
    }

    /// Zero-based grid position of a cell
    fn position(cell: CellRef) -> Result<(usize, usize)> {
        match (cell.row.checked_sub(1), cell.col.checked_sub(1)) {
            (Some(r), Some(c)) => Ok((r as usize, c as usize)),
            _ => Err(Error::CellAddress(format!("row {}, column {}", cell.row, cell.col))),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.target.with_file_name(name)
    }
}

/// Blank lines the CSV reader silently skips after byte `offset`
fn skipped_blank_lines(content: &[u8], offset: usize) -> usize {
    let newlines = content
        .get(offset..)
        .unwrap_or_default()
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    // The previous record's own line ending may not be consumed yet
    let terminator_pending = offset > 0 && content.get(offset - 1) != Some(&b'\n');
    if terminator_pending {
        newlines.saturating_sub(1)
    } else {
        newlines
    }
}

impl Sheet for CsvSheet {
    fn read_cell(&self, cell: CellRef) -> Result<String> {
        let (r, c) = Self::position(cell)?;
        let value = self
            .grid
            .get(r)
            .and_then(|row| row.get(c))
            .cloned()
            .unwrap_or_default();
        Ok(value)
    }

    fn write_cell(&mut self, cell: CellRef, value: &str) -> Result<()> {
        let (r, c) = Self::position(cell)?;
        if self.grid.len() <= r {
            self.grid.resize_with(r + 1, Vec::new);
        }
        let row = &mut self.grid[r];
        if row.len() <= c {
            row.resize(c + 1, String::new());
        }
        row[c] = value.to_string();
        Ok(())
    }

    fn extent(&self) -> Extent {
        let last_row = self
            .grid
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map_or(0, |i| i + 1);

        Extent {
            last_row: last_row as u32,
            last_col: self.width() as u32,
        }
    }

    fn persist(&mut self) -> Result<()> {
        let width = self.width();
        let temp = self.temp_path();

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&temp)?;
            for row in &self.grid {
                let padded = row
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::repeat(""))
                    .take(width.max(1));
                writer.write_record(padded)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp, &self.target).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("replace {} failed: {}", self.target.display(), e),
            ))
        })?;

        debug!(path = %self.target.display(), rows = self.grid.len(), "Persisted CSV sheet");
        Ok(())
    }
}
