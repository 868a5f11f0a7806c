use serde::Serialize;

use super::super::domain::{AssignmentSet, BalanceAttribute, Roster};
use super::super::validation::{
    ConstraintReport, HardRule, MixingQuality, RepeatedPair, Violation,
};
use super::views::{BalanceStatus, CheckView, SessionSummary};

/// Everything the presentation layer needs to render pass/fail badges for a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Hard verdict; balance findings never affect it.
    pub all_constraints_satisfied: bool,
    pub couple_violations: Vec<String>,
    pub keep_together_violations: Vec<String>,
    pub facilitator_violations: Vec<String>,
    pub gender_imbalances: Vec<String>,
    pub religion_imbalances: Vec<String>,
    pub gender_balance: BalanceStatus,
    pub religion_balance: BalanceStatus,
    pub num_tables: usize,
    pub total_participants: usize,
    pub repeat_pairings: usize,
    pub avg_new_people_met: f64,
    pub has_facilitators: bool,
    pub has_linked_pairs: bool,
    pub repeated_pairs: Vec<RepeatedPair>,
    pub sessions: Vec<SessionSummary>,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub(crate) fn assemble(
        assignments: &AssignmentSet,
        roster: &Roster,
        constraints: ConstraintReport,
        mixing: MixingQuality,
    ) -> Self {
        let has_facilitators = roster.has_facilitators();
        let has_linked_pairs = roster.has_linked_pairs();

        let couple_violations = constraints.offending_tables(HardRule::PartnersSeatedTogether);
        let keep_together_violations =
            constraints.offending_tables(HardRule::KeepTogetherSeparated);
        let facilitator_violations = constraints.offending_tables(HardRule::MissingFacilitator);
        let gender_imbalances = constraints.imbalanced_tables(BalanceAttribute::Gender);
        let religion_imbalances = constraints.imbalanced_tables(BalanceAttribute::Religion);

        let all_constraints_satisfied = couple_violations.is_empty()
            && (!has_linked_pairs || keep_together_violations.is_empty())
            && (!has_facilitators || facilitator_violations.is_empty());

        let num_tables = assignments
            .first_session()
            .map(|session| session.tables.len())
            .unwrap_or(0);

        Self {
            all_constraints_satisfied,
            gender_balance: BalanceStatus::from_offenders(&gender_imbalances),
            religion_balance: BalanceStatus::from_offenders(&religion_imbalances),
            couple_violations,
            keep_together_violations,
            facilitator_violations,
            gender_imbalances,
            religion_imbalances,
            num_tables,
            total_participants: roster.len(),
            repeat_pairings: mixing.repeat_pairings,
            avg_new_people_met: mixing.avg_new_people_met,
            has_facilitators,
            has_linked_pairs,
            repeated_pairs: mixing.repeated_pairs,
            sessions: assignments
                .sessions()
                .iter()
                .map(SessionSummary::for_session)
                .collect(),
            violations: constraints.violations,
        }
    }

    pub fn imbalances(&self, attribute: BalanceAttribute) -> &[String] {
        match attribute {
            BalanceAttribute::Gender => &self.gender_imbalances,
            BalanceAttribute::Religion => &self.religion_imbalances,
        }
    }

    /// Badge rows in display order: hard rules first, then advisory balance.
    pub fn checks(&self) -> Vec<CheckView> {
        let mut checks = vec![
            CheckView::hard(
                HardRule::PartnersSeatedTogether.label(),
                true,
                &self.couple_violations,
            ),
            CheckView::hard(
                HardRule::KeepTogetherSeparated.label(),
                self.has_linked_pairs,
                &self.keep_together_violations,
            ),
            CheckView::hard(
                HardRule::MissingFacilitator.label(),
                self.has_facilitators,
                &self.facilitator_violations,
            ),
        ];

        checks.extend(
            BalanceAttribute::ordered()
                .into_iter()
                .map(|attribute| CheckView::advisory(attribute.label(), self.imbalances(attribute))),
        );

        checks
    }
}
