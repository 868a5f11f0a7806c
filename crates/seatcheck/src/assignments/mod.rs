//! Quality checks for finished multi-session seating plans.
//!
//! Plans come from an external solver. This module only reads them: it flags hard
//! placement violations, reports advisory attribute imbalance against the
//! roster's achievable fairness bound, and measures how well people were mixed.

pub mod domain;
pub mod import;
pub mod report;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AbsentParticipant, AssignmentSet, BalanceAttribute, Participant, ParticipantId, Roster, Seat,
    Session, Table, TableRef,
};
pub use import::{AssignmentImportError, AssignmentImporter, ImportedPlan, RosterImporter};
pub use report::{BalanceStatus, CheckStatus, CheckView, SessionSummary, ValidationResult};
pub use validation::{
    fairness_bound, validate_assignments, AdvisoryImbalance, HardRule, HardViolation,
    MixingQuality, RepeatedPair, ValidationEngine, ValidationPolicy, Violation,
};
