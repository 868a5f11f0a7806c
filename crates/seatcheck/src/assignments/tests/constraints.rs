use super::common::*;
use crate::assignments::domain::{BalanceAttribute, Participant, ParticipantId, Session};
use crate::assignments::validation::{
    couples_for_tests, HardRule, ValidationEngine, ValidationPolicy, Violation,
};
use crate::assignments::{validate_assignments, BalanceStatus};

#[test]
fn even_roster_split_evenly_is_good() {
    let assignments = plan(vec![gender_session(
        1,
        &[
            &["Female", "Female", "Male", "Male"],
            &["Female", "Male", "Female", "Male"],
        ],
    )]);

    let result = validate_assignments(&assignments);

    assert!(result.gender_imbalances.is_empty());
    assert_eq!(result.gender_balance, BalanceStatus::Good);
}

#[test]
fn skewed_roster_at_its_bound_is_good() {
    let assignments = plan(vec![gender_session(
        1,
        &[
            &["Female", "Female", "Female", "Male"],
            &["Female", "Female", "Female", "Male"],
        ],
    )]);

    let result = validate_assignments(&assignments);

    assert!(result.gender_imbalances.is_empty());
    assert_eq!(result.gender_balance.label(), "Good");
}

#[test]
fn skewed_roster_beyond_its_bound_is_suboptimal() {
    let assignments = plan(vec![gender_session(
        1,
        &[
            &["Female", "Female", "Female", "Female"],
            &["Female", "Female", "Male", "Male"],
        ],
    )]);

    let result = validate_assignments(&assignments);

    assert_eq!(result.gender_imbalances, vec!["Session 1 Table 1"]);
    assert_eq!(result.gender_balance, BalanceStatus::Suboptimal);
    assert!(
        result.all_constraints_satisfied,
        "balance findings stay advisory"
    );

    match &result.violations[..] {
        [Violation::Advisory(imbalance)] => {
            assert_eq!(imbalance.attribute, BalanceAttribute::Gender);
            assert_eq!(imbalance.actual_deviation, 4);
            assert_eq!(imbalance.fairness_bound, 2);
        }
        other => panic!("expected a single advisory imbalance, got {other:?}"),
    }
}

#[test]
fn religion_balance_uses_the_same_rule() {
    let roster = [
        believer("a", "Christian"),
        believer("b", "Christian"),
        believer("c", "Muslim"),
        believer("d", "Muslim"),
        believer("e", "Jewish"),
        believer("f", "Jewish"),
    ];
    let assignments = single_session(vec![
        vec![roster[0].clone(), roster[1].clone(), roster[4].clone()],
        vec![roster[2].clone(), roster[3].clone(), roster[5].clone()],
    ]);

    let result = validate_assignments(&assignments);

    // three equal faiths at 3 seats allow a perfect split; each table has 2-0-1
    assert_eq!(
        result.religion_imbalances,
        vec!["Session 1 Table 1", "Session 1 Table 2"]
    );
    assert!(result.gender_imbalances.is_empty());
}

#[test]
fn partner_pair_flags_table_once_regardless_of_order() {
    let ada = person("Ada", "Female").with_partner("Ben");
    let ben = person("Ben", "Male").with_partner("Ada");
    let cy = person("Cy", "Male");

    let forward = single_session(vec![vec![ada.clone(), ben.clone(), cy.clone()]]);
    let reverse = single_session(vec![vec![ben.clone(), cy.clone(), ada.clone()]]);

    for assignments in [forward, reverse] {
        let result = validate_assignments(&assignments);
        assert_eq!(result.couple_violations, vec!["Session 1 Table 1"]);
        assert!(!result.all_constraints_satisfied);

        let table = &assignments.sessions()[0].tables[&1];
        assert_eq!(
            couples_for_tests(table),
            vec![(ParticipantId::from("Ada"), ParticipantId::from("Ben"))]
        );
    }
}

#[test]
fn one_sided_partner_link_still_counts() {
    let ada = person("Ada", "Female").with_partner("Ben");
    let ben = person("Ben", "Male");

    let result = validate_assignments(&single_session(vec![vec![ada, ben]]));

    assert_eq!(result.couple_violations, vec!["Session 1 Table 1"]);
}

#[test]
fn separated_partners_pass() {
    let ada = person("Ada", "Female").with_partner("Ben");
    let ben = person("Ben", "Male").with_partner("Ada");

    let result = validate_assignments(&single_session(vec![vec![ada], vec![ben]]));

    assert!(result.couple_violations.is_empty());
    assert!(result.all_constraints_satisfied);
}

#[test]
fn separated_keep_together_pair_flags_both_tables() {
    let ada = person("Ada", "Female").with_partner("Ben").kept_together();
    let ben = person("Ben", "Male").with_partner("Ada").kept_together();
    let cy = person("Cy", "Male");
    let di = person("Di", "Female");

    let result = validate_assignments(&single_session(vec![vec![ada, cy], vec![ben, di]]));

    assert!(result.has_linked_pairs);
    assert_eq!(
        result.keep_together_violations,
        vec!["Session 1 Table 1", "Session 1 Table 2"]
    );
    assert!(result.couple_violations.is_empty());
    assert!(!result.all_constraints_satisfied);
}

#[test]
fn keep_together_pair_seated_together_still_reports_couple() {
    let ada = person("Ada", "Female").with_partner("Ben").kept_together();
    let ben = person("Ben", "Male").with_partner("Ada").kept_together();

    let result = validate_assignments(&single_session(vec![vec![ada, ben]]));

    assert!(result.keep_together_violations.is_empty());
    assert_eq!(result.couple_violations, vec!["Session 1 Table 1"]);
}

#[test]
fn keep_together_partner_absent_from_session_is_flagged() {
    let ada = person("Ada", "Female").with_partner("Ben").kept_together();
    let ben = person("Ben", "Male").with_partner("Ada").kept_together();

    let assignments = plan(vec![
        Session::new(1).with_table(1, seated(&[ada.clone(), ben])),
        Session::new(2).with_table(4, seated(&[ada])),
    ]);

    let result = validate_assignments(&assignments);

    assert_eq!(result.keep_together_violations, vec!["Session 2 Table 4"]);
}

#[test]
fn facilitator_gaps_are_reported_when_roster_has_facilitators() {
    let lead = person("Lead", "Female").as_facilitator();
    let assignments = single_session(vec![
        vec![lead, person("Ben", "Male")],
        vec![person("Cy", "Male"), person("Di", "Female")],
    ]);

    let result = validate_assignments(&assignments);

    assert!(result.has_facilitators);
    assert_eq!(result.facilitator_violations, vec!["Session 1 Table 2"]);
    assert!(!result.all_constraints_satisfied);
}

#[test]
fn facilitator_check_is_skipped_without_facilitators() {
    let assignments = single_session(vec![
        vec![person("Ada", "Female"), person("Ben", "Male")],
        vec![person("Cy", "Male"), person("Di", "Female")],
    ]);

    let result = validate_assignments(&assignments);

    assert!(!result.has_facilitators);
    assert!(result.facilitator_violations.is_empty());
    assert!(result.all_constraints_satisfied);
}

#[test]
fn unoccupied_tables_are_ignored_by_every_check() {
    let lead = person("Lead", "Female").as_facilitator();
    let assignments = plan(vec![Session::new(1)
        .with_table(1, seated(&[lead, person("Ben", "Male")]))
        .with_table(2, vec![None, None, None])]);

    let result = validate_assignments(&assignments);

    assert!(result.violations.is_empty());
    assert_eq!(result.num_tables, 2);
}

#[test]
fn table_order_follows_session_then_table_number() {
    let assignments = plan(vec![
        Session::new(2)
            .with_table(9, seated(&[person("A", "Female").with_partner("B"), person("B", "Male")]))
            .with_table(3, seated(&[person("C", "Female").with_partner("D"), person("D", "Male")])),
        Session::new(1)
            .with_table(5, seated(&[person("A", "Female").with_partner("B"), person("B", "Male")])),
    ]);

    let result = validate_assignments(&assignments);

    assert_eq!(
        result.couple_violations,
        vec!["Session 2 Table 3", "Session 2 Table 9", "Session 1 Table 5"]
    );
}

#[test]
fn repeated_session_numbers_do_not_duplicate_labels() {
    let couple = || {
        seated(&[
            person("A", "Female").with_partner("B"),
            person("B", "Male"),
        ])
    };
    let assignments = plan(vec![
        Session::new(1).with_table(1, couple()),
        Session::new(1).with_table(1, couple()),
    ]);

    let result = validate_assignments(&assignments);

    assert_eq!(result.couple_violations, vec!["Session 1 Table 1"]);
}

#[test]
fn detection_is_deterministic() {
    let assignments = plan(vec![gender_session(
        1,
        &[
            &["Female", "Female", "Female", "Female"],
            &["Female", "Female", "Male", "Male"],
        ],
    )]);
    let engine = ValidationEngine::default();

    assert_eq!(engine.validate(&assignments), engine.validate(&assignments));
}

#[test]
fn policy_can_disable_an_attribute() {
    let assignments = plan(vec![gender_session(
        1,
        &[
            &["Female", "Female", "Female", "Female"],
            &["Female", "Female", "Male", "Male"],
        ],
    )]);
    let engine = ValidationEngine::new(ValidationPolicy {
        balance_attributes: vec![BalanceAttribute::Religion],
    });

    let result = engine.validate(&assignments);

    assert!(result.gender_imbalances.is_empty());
    assert!(!engine.policy().checks(BalanceAttribute::Gender));
}

#[test]
fn hard_and_advisory_findings_stay_distinct() {
    let lead = person("Lead", "Female").as_facilitator();
    let assignments = single_session(vec![
        vec![
            lead,
            person("F1", "Female"),
            person("F2", "Female"),
            person("F3", "Female"),
        ],
        vec![
            person("M1", "Male"),
            person("M2", "Male"),
            person("F4", "Female"),
            person("F5", "Female"),
        ],
    ]);

    let result = validate_assignments(&assignments);

    let hard: Vec<_> = result.violations.iter().filter(|v| v.is_hard()).collect();
    let advisory: Vec<_> = result.violations.iter().filter(|v| !v.is_hard()).collect();
    assert_eq!(hard.len(), 1);
    assert_eq!(advisory.len(), 1);
    match hard[0] {
        Violation::Hard(violation) => assert_eq!(violation.rule, HardRule::MissingFacilitator),
        other => panic!("expected hard violation, got {other:?}"),
    }
    assert_eq!(advisory[0].table().label(), "Session 1 Table 1");
}

#[test]
fn policy_order_does_not_change_finding_order() {
    let women: Vec<_> = (1..=4)
        .map(|n| Participant::named(&format!("w{n}"), "Christian", "Female"))
        .collect();
    let men: Vec<_> = (1..=4)
        .map(|n| Participant::named(&format!("m{n}"), "Muslim", "Male"))
        .collect();
    let assignments = single_session(vec![women, men]);
    let engine = ValidationEngine::new(ValidationPolicy {
        balance_attributes: vec![BalanceAttribute::Religion, BalanceAttribute::Gender],
    });

    let attributes: Vec<_> = engine
        .validate(&assignments)
        .violations
        .iter()
        .filter_map(|violation| match violation {
            Violation::Advisory(imbalance) => Some(imbalance.attribute),
            Violation::Hard(_) => None,
        })
        .collect();

    assert_eq!(
        attributes,
        vec![
            BalanceAttribute::Gender,
            BalanceAttribute::Religion,
            BalanceAttribute::Gender,
            BalanceAttribute::Religion,
        ]
    );
}
