use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::super::domain::{
    AssignmentSet, BalanceAttribute, Participant, ParticipantId, Roster, Table, TableRef,
};
use super::fairness::{actual_deviation, fairness_bound};
use super::ValidationPolicy;

/// Placement rules whose violation makes an assignment unacceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardRule {
    PartnersSeatedTogether,
    KeepTogetherSeparated,
    MissingFacilitator,
}

impl HardRule {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PartnersSeatedTogether => "Couples separated",
            Self::KeepTogetherSeparated => "Linked pairs together",
            Self::MissingFacilitator => "Facilitator at every table",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardViolation {
    pub rule: HardRule,
    pub table: TableRef,
}

/// A table whose attribute spread exceeds what the roster makes achievable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryImbalance {
    pub attribute: BalanceAttribute,
    pub table: TableRef,
    pub actual_deviation: usize,
    pub fairness_bound: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Hard(HardViolation),
    Advisory(AdvisoryImbalance),
}

impl Violation {
    pub fn table(&self) -> TableRef {
        match self {
            Violation::Hard(violation) => violation.table,
            Violation::Advisory(imbalance) => imbalance.table,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Violation::Hard(_))
    }
}

/// Every violation found, in session then table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintReport {
    pub violations: Vec<Violation>,
}

impl ConstraintReport {
    /// Labels of tables breaking `rule`, deduplicated and in plan order.
    pub fn offending_tables(&self, rule: HardRule) -> Vec<String> {
        unique_labels(self.violations.iter().filter_map(|violation| match violation {
            Violation::Hard(hard) if hard.rule == rule => Some(hard.table),
            _ => None,
        }))
    }

    /// Labels of tables flagged as imbalanced for `attribute`.
    pub fn imbalanced_tables(&self, attribute: BalanceAttribute) -> Vec<String> {
        unique_labels(self.violations.iter().filter_map(|violation| match violation {
            Violation::Advisory(imbalance) if imbalance.attribute == attribute => {
                Some(imbalance.table)
            }
            _ => None,
        }))
    }
}

fn unique_labels<I>(tables: I) -> Vec<String>
where
    I: IntoIterator<Item = TableRef>,
{
    let mut seen = HashSet::new();
    tables
        .into_iter()
        .filter(|table| seen.insert(*table))
        .map(|table| table.label())
        .collect()
}

/// Roster-wide figures shared by every table check.
struct RosterBaseline {
    total: usize,
    category_counts: Vec<(BalanceAttribute, BTreeMap<String, usize>)>,
    facilitators_expected: bool,
}

impl RosterBaseline {
    fn new(roster: &Roster, policy: &ValidationPolicy) -> Self {
        let category_counts = BalanceAttribute::ordered()
            .into_iter()
            .filter(|&attribute| policy.checks(attribute))
            .map(|attribute| (attribute, roster.category_counts(attribute)))
            .collect();

        Self {
            total: roster.len(),
            category_counts,
            facilitators_expected: roster.has_facilitators(),
        }
    }
}

pub(crate) fn detect_violations(
    assignments: &AssignmentSet,
    roster: &Roster,
    policy: &ValidationPolicy,
) -> ConstraintReport {
    let baseline = RosterBaseline::new(roster, policy);
    let mut violations = Vec::new();

    for session in assignments.sessions() {
        for table in session.tables() {
            if table.is_unoccupied() {
                continue;
            }
            let location = session.table_ref(table);
            check_table(table, location, &baseline, &mut violations);
        }
    }

    ConstraintReport { violations }
}

fn check_table(
    table: &Table,
    location: TableRef,
    baseline: &RosterBaseline,
    violations: &mut Vec<Violation>,
) {
    let seated: Vec<&Participant> = table.real_participants().collect();
    let seated_ids: HashSet<&ParticipantId> = seated.iter().map(|p| &p.id).collect();

    if !co_seated_couples(&seated, &seated_ids).is_empty() {
        violations.push(Violation::Hard(HardViolation {
            rule: HardRule::PartnersSeatedTogether,
            table: location,
        }));
    }

    let linked_pair_split = seated.iter().any(|participant| {
        participant.keep_together
            && participant
                .partner
                .as_ref()
                .is_some_and(|partner| !seated_ids.contains(partner))
    });
    if linked_pair_split {
        violations.push(Violation::Hard(HardViolation {
            rule: HardRule::KeepTogetherSeparated,
            table: location,
        }));
    }

    for (attribute, counts) in &baseline.category_counts {
        let deviation = actual_deviation(
            counts,
            seated.iter().map(|participant| participant.attribute(*attribute)),
        );
        let bound = fairness_bound(counts, baseline.total, seated.len());

        if deviation > bound {
            violations.push(Violation::Advisory(AdvisoryImbalance {
                attribute: *attribute,
                table: location,
                actual_deviation: deviation,
                fairness_bound: bound,
            }));
        }
    }

    if baseline.facilitators_expected && !seated.iter().any(|p| p.is_facilitator) {
        violations.push(Violation::Hard(HardViolation {
            rule: HardRule::MissingFacilitator,
            table: location,
        }));
    }
}

/// Partner pairs sharing the table, keyed by sorted id pair so each couple counts once.
fn co_seated_couples<'a>(
    seated: &[&'a Participant],
    seated_ids: &HashSet<&ParticipantId>,
) -> HashSet<(&'a ParticipantId, &'a ParticipantId)> {
    seated
        .iter()
        .copied()
        .filter_map(|participant| {
            let partner = participant.partner.as_ref()?;
            if partner == &participant.id || !seated_ids.contains(partner) {
                return None;
            }
            Some(if participant.id <= *partner {
                (&participant.id, partner)
            } else {
                (partner, &participant.id)
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn couples_for_tests(table: &Table) -> Vec<(ParticipantId, ParticipantId)> {
    let seated: Vec<&Participant> = table.real_participants().collect();
    let seated_ids: HashSet<&ParticipantId> = seated.iter().map(|p| &p.id).collect();
    let mut couples: Vec<_> = co_seated_couples(&seated, &seated_ids)
        .into_iter()
        .map(|(first, second)| (first.clone(), second.clone()))
        .collect();
    couples.sort();
    couples
}
