//! Orden de steps y proyección del join schemes ⋈ steps.

mod test_support;

use scheme_core::{NewScheme, NewStep, SchemeRepository};
use scheme_persistence::sqlite::PoolProvider;
use scheme_persistence::SqliteSchemeRepository;

fn repo() -> SqliteSchemeRepository<PoolProvider> {
    SqliteSchemeRepository::from_pool(test_support::fresh_pool())
}

#[test]
fn steps_come_back_sorted_by_step_number() {
    let mut repo = repo();
    let scheme = repo.add(NewScheme::new("Find the Holy Grail")).unwrap();
    // insertados fuera de orden
    repo.add_step(NewStep::new(2, "...and quest"), scheme.id).unwrap();
    repo.add_step(NewStep::new(3, "...and more quest"), scheme.id).unwrap();
    let steps = repo.add_step(NewStep::new(1, "quest"), scheme.id).unwrap();

    let numbers: Vec<i32> = steps.iter().map(|v| v.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(steps.iter().all(|v| v.scheme_name == "Find the Holy Grail"));
}

#[test]
fn duplicate_step_numbers_keep_insertion_order() {
    let mut repo = repo();
    let scheme = repo.add(NewScheme::new("dup")).unwrap();
    repo.add_step(NewStep::new(1, "first inserted"), scheme.id).unwrap();
    let steps = repo.add_step(NewStep::new(1, "second inserted"), scheme.id).unwrap();

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].instructions, "first inserted");
    assert_eq!(steps[1].instructions, "second inserted");
}

#[test]
fn step_listing_does_not_leak_between_schemes() {
    let mut repo = repo();
    let grail = repo.add(NewScheme::new("Find the Holy Grail")).unwrap();
    let other = repo.add(NewScheme::new("Something Completely Different")).unwrap();
    repo.add_step(NewStep::new(1, "quest"), grail.id).unwrap();
    repo.add_step(NewStep::new(1, "run away"), other.id).unwrap();

    let grail_steps = repo.find_steps(grail.id).unwrap();
    assert_eq!(grail_steps.len(), 1);
    assert_eq!(grail_steps[0].scheme_name, "Find the Holy Grail");
    assert_eq!(grail_steps[0].instructions, "quest");
}

#[test]
fn unknown_scheme_and_scheme_without_steps_yield_empty() {
    let mut repo = repo();
    assert!(repo.find_steps(999).unwrap().is_empty());
    let empty = repo.add(NewScheme::new("no steps yet")).unwrap();
    assert!(repo.find_steps(empty.id).unwrap().is_empty());
}

#[test]
fn add_step_returns_updated_collection() {
    let mut repo = repo();
    let scheme = repo.add(NewScheme::new("grows")).unwrap();
    let first = repo.add_step(NewStep::new(1, "quest"), scheme.id).unwrap();
    assert_eq!(first.len(), 1);
    let second = repo.add_step(NewStep::new(2, "...and quest"), scheme.id).unwrap();
    assert_eq!(second.len(), first.len() + 1);
    // equivalente a find_steps inmediatamente después del insert
    assert_eq!(second, repo.find_steps(scheme.id).unwrap());
}

#[test]
fn add_step_parameter_wins_over_payload_scheme_id() {
    let mut repo = repo();
    let target = repo.add(NewScheme::new("target")).unwrap();
    let decoy = repo.add(NewScheme::new("decoy")).unwrap();

    let payload = NewStep { step_number: 1, instructions: "quest".into(), scheme_id: Some(decoy.id) };
    let steps = repo.add_step(payload, target.id).unwrap();

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].scheme_name, "target");
    assert!(repo.find_steps(decoy.id).unwrap().is_empty());
}
