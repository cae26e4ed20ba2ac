//! Club Authority listing parser
//!
//! The listing is an HTML table whose markup is inconsistent enough that a
//! full DOM walk buys nothing. Parsing runs in two phases:
//!
//! 1. [`tokenize`]: normalize the markup and pull out the `<th>` and `<td>`
//!    inner fragments as two flat, ordered sequences.
//! 2. [`reconstruct`]: regroup the flat data sequence into records of
//!    `header count` fields each (record `r`, field `c` sits at
//!    `r * num_cols + c`) and map each record to a candidate through
//!    [`ColumnRoles`].
//!
//! A trailing partial record is discarded.

use crate::error::AuthorityError;
use crate::types::ClubRegistrationCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// Safety: the patterns below are compile-time constants and known to be valid.
static SPACE_BEFORE_GT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+>").unwrap());
static HEADER_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<th\b[^>]*>(.*?)</th>").unwrap());
static DATA_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<b\b[^>]*>(.*?)</b>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Width of the markup artifact trailing every license cell
const LICENSE_SUFFIX_CHARS: usize = 3;

/// Flat header and data fragments, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFragments {
    pub headers: Vec<String>,
    pub cells: Vec<String>,
}

/// Which field of a record plays which role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    pub name: usize,
    pub license: usize,
    pub status: usize,
}

impl ColumnRoles {
    pub const NAME_OFFSET: usize = 1;
    pub const LICENSE_OFFSET: usize = 2;

    /// Roles for a table `num_cols` wide; status is always the last column.
    /// `None` when the table is too narrow to hold all three roles.
    pub fn for_width(num_cols: usize) -> Option<Self> {
        (num_cols > Self::LICENSE_OFFSET).then(|| Self {
            name: Self::NAME_OFFSET,
            license: Self::LICENSE_OFFSET,
            status: num_cols - 1,
        })
    }
}

/// Phase 1: flat header and data fragments
pub fn tokenize(html: &str) -> ListingFragments {
    let normalized = SPACE_BEFORE_GT.replace_all(html, ">");

    let capture = |re: &Regex| -> Vec<String> {
        re.captures_iter(&normalized)
            .map(|c| c[1].to_string())
            .collect()
    };

    ListingFragments {
        headers: capture(&HEADER_CELL),
        cells: capture(&DATA_CELL),
    }
}

/// Phase 2: fixed-width records to candidates, in listing order
pub fn reconstruct(
    fragments: &ListingFragments,
) -> Result<Vec<ClubRegistrationCandidate>, AuthorityError> {
    let num_cols = fragments.headers.len();
    if fragments.cells.is_empty() {
        return Ok(Vec::new());
    }

    let roles = ColumnRoles::for_width(num_cols).ok_or_else(|| {
        AuthorityError::Decode(format!(
            "listing has {} data cells but only {} header cells",
            fragments.cells.len(),
            num_cols
        ))
    })?;

    let records = fragments.cells.chunks_exact(num_cols);
    let leftover = records.remainder().len();
    if leftover > 0 {
        debug!(leftover, num_cols, "Discarding partial trailing listing record");
    }

    Ok(records
        .map(|record| candidate_from_record(record, &roles))
        .collect())
}

/// Both phases
pub fn parse_listing(html: &str) -> Result<Vec<ClubRegistrationCandidate>, AuthorityError> {
    let fragments = tokenize(html);
    debug!(
        headers = fragments.headers.len(),
        cells = fragments.cells.len(),
        "Tokenized club listing"
    );
    reconstruct(&fragments)
}

fn candidate_from_record(record: &[String], roles: &ColumnRoles) -> ClubRegistrationCandidate {
    let status = text_of(&record[roles.status]);
    ClubRegistrationCandidate {
        display_name: name_of(&record[roles.name]),
        license_code: license_of(&record[roles.license]),
        is_active: !status.is_empty(),
    }
}

/// First and last token of the bolded name; middle names are dropped.
/// Falls back to the whole cell when there is no bold element.
fn name_of(fragment: &str) -> String {
    let source = BOLD
        .captures(fragment)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| fragment.to_string());
    let text = text_of(&source);
    let tokens: Vec<&str> = text.split_whitespace().collect();

    match tokens.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, .., last] => format!("{first} {last}"),
    }
}

/// License cell minus its fixed-width trailing artifact
fn license_of(fragment: &str) -> String {
    let raw = fragment.trim();
    let keep = raw.chars().count().saturating_sub(LICENSE_SUFFIX_CHARS);
    let stripped: String = raw.chars().take(keep).collect();
    text_of(&stripped)
}

/// Visible text: tags removed, common entities decoded, whitespace collapsed
fn text_of(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
