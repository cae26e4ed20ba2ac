//! Per-row resolution stages

pub mod club;
pub mod identity;
pub mod membership;
pub mod name;

pub use club::ClubRegistrationResolver;
pub use identity::{IdentityOutcome, IdentityResolver};
pub use membership::MembershipAggregator;
pub use name::NameReconciler;
