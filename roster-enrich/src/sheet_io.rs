//! Roster sheet adapter
//!
//! Maps a [`Sheet`] onto the pipeline's [`RowSource`] and [`RowSink`]:
//! - the header row names the ID columns (`AICF ID`, `FIDE ID`)
//! - data rows start right below the header and end at the first row whose
//!   lead cell (column A) is empty
//! - four output columns sit after the last pre-existing column; on a re-run
//!   the columns found by header label are reused

use crate::error::{EnrichError, EnrichResult};
use crate::pipeline::{RowSink, RowSource, SourceRow};
use crate::types::{EnrichedRow, MembershipClassification, PlayerIdentity};
use roster_common::sheet::{CellRef, Sheet};
use tracing::{debug, info};

/// Header label of the national ID column
pub const NATIONAL_ID_HEADER: &str = "AICF ID";

/// Header label of the international ID column
pub const INTERNATIONAL_ID_HEADER: &str = "FIDE ID";

pub const MEMBERSHIP_HEADER: &str = "Membership_Status";
pub const LICENSE_HEADER: &str = "MCA ID";
pub const NAME_HEADER: &str = "Player Name";
pub const REGISTRATION_NAME_HEADER: &str = "MCA Name";

/// Output column labels, in the order they are appended
pub const OUTPUT_HEADERS: [&str; 4] = [
    MEMBERSHIP_HEADER,
    LICENSE_HEADER,
    NAME_HEADER,
    REGISTRATION_NAME_HEADER,
];

/// Column numbers (1-based) of everything the pipeline reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub header_row: u32,
    pub national_col: Option<u32>,
    pub international_col: Option<u32>,
    pub membership_col: u32,
    pub license_col: u32,
    pub name_col: u32,
    pub registration_name_col: u32,
}

impl SheetLayout {
    /// Inspect the header row, place the output columns and label them
    pub fn prepare<S: Sheet>(sheet: &mut S, header_row: u32) -> EnrichResult<Self> {
        if header_row == 0 {
            return Err(EnrichError::Layout("header row numbers start at 1".to_string()));
        }

        let last_col = sheet.extent().last_col;
        let mut labels = Vec::with_capacity(last_col as usize);
        for col in 1..=last_col {
            labels.push(sheet.read_cell(CellRef::new(header_row, col)?)?);
        }
        let find = |label: &str| {
            labels
                .iter()
                .position(|l| l.trim().eq_ignore_ascii_case(label))
                .map(|i| i as u32 + 1)
        };

        let national_col = find(NATIONAL_ID_HEADER);
        let international_col = find(INTERNATIONAL_ID_HEADER);
        if national_col.is_none() && international_col.is_none() {
            return Err(EnrichError::Layout(format!(
                "row {header_row} has neither an '{NATIONAL_ID_HEADER}' nor a '{INTERNATIONAL_ID_HEADER}' header"
            )));
        }

        let mut next_free = last_col;
        let mut output = [0u32; 4];
        for (slot, label) in output.iter_mut().zip(OUTPUT_HEADERS) {
            *slot = find(label).unwrap_or_else(|| {
                next_free += 1;
                next_free
            });
            sheet.write_cell(CellRef::new(header_row, *slot)?, label)?;
        }

        let layout = Self {
            header_row,
            national_col,
            international_col,
            membership_col: output[0],
            license_col: output[1],
            name_col: output[2],
            registration_name_col: output[3],
        };
        debug!(?layout, "Sheet layout prepared");
        Ok(layout)
    }
}

/// A prepared sheet acting as both row source and row sink
pub struct SheetRoster<S: Sheet> {
    sheet: S,
    layout: SheetLayout,
    next_row: u32,
}

impl<S: Sheet> SheetRoster<S> {
    /// Prepare the layout and persist the header labels before any row runs
    pub fn open(mut sheet: S, header_row: u32) -> EnrichResult<Self> {
        let layout = SheetLayout::prepare(&mut sheet, header_row)?;
        sheet.persist()?;
        info!(
            header_row,
            national_col = ?layout.national_col,
            international_col = ?layout.international_col,
            "Roster sheet opened"
        );

        Ok(Self {
            sheet,
            layout,
            next_row: header_row + 1,
        })
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn into_inner(self) -> S {
        self.sheet
    }

    fn read(&self, row: u32, col: Option<u32>) -> roster_common::Result<String> {
        match col {
            Some(col) => self.sheet.read_cell(CellRef::new(row, col)?),
            None => Ok(String::new()),
        }
    }

    fn write(&mut self, row: u32, col: u32, value: &str) -> roster_common::Result<()> {
        self.sheet.write_cell(CellRef::new(row, col)?, value)
    }
}

impl<S: Sheet> RowSource for SheetRoster<S> {
    fn next_row(&mut self) -> roster_common::Result<Option<SourceRow>> {
        let row = self.next_row;
        let lead = self.sheet.read_cell(CellRef::new(row, 1)?)?;
        if lead.trim().is_empty() {
            debug!(row, "Table ends at empty lead cell");
            return Ok(None);
        }

        let national = self.read(row, self.layout.national_col)?;
        let international = self.read(row, self.layout.international_col)?;
        let stored = self.read(row, Some(self.layout.membership_col))?;

        self.next_row += 1;
        Ok(Some(SourceRow {
            row_index: row,
            identity: PlayerIdentity::new(&national, &international),
            stored_membership: MembershipClassification::from_label(&stored),
        }))
    }
}

impl<S: Sheet> RowSink for SheetRoster<S> {
    /// Classification is always written. Optional fields are only written when
    /// resolved so a failed re-run never erases earlier results.
    fn emit(&mut self, row: &EnrichedRow) -> roster_common::Result<()> {
        let r = row.row_index;
        let layout = self.layout;

        self.write(r, layout.membership_col, row.membership.label())?;
        if let Some(registration) = &row.registration {
            self.write(r, layout.license_col, &registration.license_code)?;
            self.write(r, layout.registration_name_col, &registration.display_name)?;
        }
        if let Some(name) = &row.resolved_name {
            self.write(r, layout.name_col, name)?;
        }

        self.sheet.persist()
    }
}
