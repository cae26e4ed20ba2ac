//! Tabular sheet storage
//!
//! The [`Sheet`] trait is the storage boundary of the enrichment pipeline:
//! read a cell, write a string cell, report the used extent, persist.
//! [`CsvSheet`] is the file-backed implementation.

pub mod address;
pub mod csv_sheet;

pub use address::{column_index, column_name, CellRef};
pub use csv_sheet::CsvSheet;

use crate::Result;

/// Used area of a sheet: last row and last column holding any cell (1-based)
///
/// An empty sheet has an extent of `0 x 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub last_row: u32,
    pub last_col: u32,
}

/// Cell-addressable tabular storage
pub trait Sheet {
    /// Cell contents; cells outside the used area read as empty
    fn read_cell(&self, cell: CellRef) -> Result<String>;

    /// Overwrite a cell, growing the used area when needed
    fn write_cell(&mut self, cell: CellRef, value: &str) -> Result<()>;

    fn extent(&self) -> Extent;

    /// Flush every write so far to durable storage
    fn persist(&mut self) -> Result<()>;
}
