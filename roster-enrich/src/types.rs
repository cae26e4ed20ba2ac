//! Shared types passed between the authority client, the resolvers and the
//! orchestrator.

use crate::error::AuthorityError;
use std::fmt;
use tracing::{debug, warn};

/// Sheet label written for [`MembershipClassification::Active`]
pub const ACTIVE_LABEL: &str = "Active";

/// Sheet label written for [`MembershipClassification::CheckManually`]
pub const CHECK_MANUALLY_LABEL: &str = "Check Manually";

/// Active label written by earlier releases of the tool
const LEGACY_ACTIVE_LABEL: &str = "Yes";

// ============================================================================
// Identity
// ============================================================================

/// A row's player identity; either ID may be missing
///
/// Blank and whitespace-only IDs are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerIdentity {
    national_id: Option<String>,
    international_id: Option<String>,
}

impl PlayerIdentity {
    pub fn new(national_id: &str, international_id: &str) -> Self {
        Self {
            national_id: non_blank(national_id),
            international_id: non_blank(international_id),
        }
    }

    pub fn national_id(&self) -> Option<&str> {
        self.national_id.as_deref()
    }

    pub fn international_id(&self) -> Option<&str> {
        self.international_id.as_deref()
    }

    /// Both IDs missing
    pub fn is_empty(&self) -> bool {
        self.national_id.is_none() && self.international_id.is_none()
    }

    /// Copy of this identity with the national ID filled in
    pub fn with_national_id(mut self, national_id: &str) -> Self {
        self.national_id = non_blank(national_id);
        self
    }

    /// Non-empty IDs, international first
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.international_id().into_iter().chain(self.national_id())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// Membership
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipClassification {
    Active,
    /// Automated resolution was inconclusive; needs human review
    CheckManually,
}

impl MembershipClassification {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => ACTIVE_LABEL,
            Self::CheckManually => CHECK_MANUALLY_LABEL,
        }
    }

    /// Parse a stored sheet label; unknown or blank text yields `None`
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(ACTIVE_LABEL) || label.eq_ignore_ascii_case(LEGACY_ACTIVE_LABEL) {
            Some(Self::Active)
        } else if label.eq_ignore_ascii_case(CHECK_MANUALLY_LABEL) {
            Some(Self::CheckManually)
        } else {
            None
        }
    }
}

impl fmt::Display for MembershipClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One Membership Authority player record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// National ID as known to the Membership Authority
    pub identifier: String,
    pub membership_active: bool,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

impl PlayerRecord {
    /// Non-empty name fragments joined by single spaces
    pub fn display_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Club registration
// ============================================================================

/// One parsed row of the Club Authority listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubRegistrationCandidate {
    pub display_name: String,
    pub license_code: String,
    /// Any non-empty status text counts as active
    pub is_active: bool,
}

// ============================================================================
// Row results
// ============================================================================

/// Pipeline stage that reported a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Identity,
    Membership,
    Registration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::Membership => "membership",
            Self::Registration => "registration",
        };
        f.write_str(name)
    }
}

/// Recoverable, row-scoped failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub stage: Stage,
    pub identifier: String,
    pub error: AuthorityError,
}

/// Diagnostic collector for one row; logs each entry as it is recorded
#[derive(Debug)]
pub struct Diagnostics {
    row_index: u32,
    entries: Vec<RowDiagnostic>,
}

impl Diagnostics {
    pub fn new(row_index: u32) -> Self {
        Self {
            row_index,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: Stage, identifier: &str, error: AuthorityError) {
        // Out-of-scope IDs are expected for most rosters
        if matches!(error, AuthorityError::Validation(_)) {
            debug!(row = self.row_index, %stage, id = %identifier, %error, "Lookup skipped");
        } else {
            warn!(row = self.row_index, %stage, id = %identifier, %error, "Lookup failed");
        }

        self.entries.push(RowDiagnostic {
            stage,
            identifier: identifier.to_string(),
            error,
        });
    }

    pub fn into_entries(self) -> Vec<RowDiagnostic> {
        self.entries
    }
}

/// Final result for one data row, emitted exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    pub row_index: u32,
    pub identity: PlayerIdentity,
    pub membership: MembershipClassification,
    pub registration: Option<ClubRegistrationCandidate>,
    pub resolved_name: Option<String>,
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Counts reported at the end of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub active: usize,
    pub check_manually: usize,
    pub registered: usize,
    pub with_diagnostics: usize,
}

impl BatchSummary {
    pub fn record(&mut self, row: &EnrichedRow) {
        self.rows += 1;
        match row.membership {
            MembershipClassification::Active => self.active += 1,
            MembershipClassification::CheckManually => self.check_manually += 1,
        }
        if row.registration.is_some() {
            self.registered += 1;
        }
        if !row.diagnostics.is_empty() {
            self.with_diagnostics += 1;
        }
    }
}
