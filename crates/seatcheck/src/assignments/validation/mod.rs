mod constraints;
mod fairness;
mod mixing;

pub use constraints::{
    AdvisoryImbalance, ConstraintReport, HardRule, HardViolation, Violation,
};
pub use fairness::fairness_bound;
pub use mixing::{MixingQuality, RepeatedPair};

use super::domain::{AssignmentSet, BalanceAttribute, Roster};
use super::import::ImportedPlan;
use super::report::ValidationResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(test)]
pub(crate) use constraints::couples_for_tests;

/// Which soft-balance checks the engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub balance_attributes: Vec<BalanceAttribute>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            balance_attributes: BalanceAttribute::ordered().to_vec(),
        }
    }
}

impl ValidationPolicy {
    pub fn checks(&self, attribute: BalanceAttribute) -> bool {
        self.balance_attributes.contains(&attribute)
    }
}

/// Stateless evaluator scoring a finished seating plan.
///
/// Holds only the policy, so one engine can be shared across threads and reused
/// for any number of plans.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    policy: ValidationPolicy,
}

impl ValidationEngine {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate using the first session's seated participants as the roster.
    pub fn validate(&self, assignments: &AssignmentSet) -> ValidationResult {
        let roster = Roster::from_first_session(assignments);
        self.validate_with_roster(assignments, &roster)
    }

    /// Validate an imported plan, preferring the roster it was shipped with.
    pub fn validate_plan(&self, plan: &ImportedPlan) -> ValidationResult {
        match &plan.roster {
            Some(roster) => self.validate_with_roster(&plan.assignments, roster),
            None => self.validate(&plan.assignments),
        }
    }

    /// Validate against an explicitly supplied roster.
    pub fn validate_with_roster(
        &self,
        assignments: &AssignmentSet,
        roster: &Roster,
    ) -> ValidationResult {
        let constraints = constraints::detect_violations(assignments, roster, &self.policy);
        let mixing = mixing::analyze_mixing(assignments, roster);
        let result = ValidationResult::assemble(assignments, roster, constraints, mixing);

        debug!(
            sessions = assignments.sessions().len(),
            roster = roster.len(),
            violations = result.violations.len(),
            repeat_pairings = result.repeat_pairings,
            satisfied = result.all_constraints_satisfied,
            "validated seating plan"
        );

        result
    }
}

/// Validate with the default policy and a roster derived from the first session.
pub fn validate_assignments(assignments: &AssignmentSet) -> ValidationResult {
    ValidationEngine::default().validate(assignments)
}
