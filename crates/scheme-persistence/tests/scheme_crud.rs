//! Round-trip CRUD de schemes sobre el backend SQLite.

mod test_support;

use scheme_core::{NewScheme, NewStep, SchemeChanges, SchemeRepository, StoreError};
use scheme_persistence::sqlite::PoolProvider;
use scheme_persistence::SqliteSchemeRepository;

fn repo() -> SqliteSchemeRepository<PoolProvider> {
    SqliteSchemeRepository::from_pool(test_support::fresh_pool())
}

#[test]
fn add_assigns_id_and_read_back_observes_store_defaults() {
    let mut repo = repo();
    let created = repo.add(NewScheme::new("Find the Holy Grail")).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.scheme_name, "Find the Holy Grail");
    // created_at lo puso la base (DEFAULT CURRENT_TIMESTAMP) y la relectura
    // post-insert lo trae; releer por id devuelve exactamente lo mismo
    assert_eq!(repo.find_by_id(created.id).unwrap(), Some(created));
}

#[test]
fn find_returns_insertion_order() {
    let mut repo = repo();
    let a = repo.add(NewScheme::new("a")).unwrap();
    let b = repo.add(NewScheme::new("b")).unwrap();
    let c = repo.add(NewScheme::new("c")).unwrap();
    assert_eq!(repo.find().unwrap(), vec![a, b, c]);
}

#[test]
fn find_by_id_missing_is_none() {
    let repo = repo();
    assert_eq!(repo.find_by_id(99).unwrap(), None);
}

#[test]
fn update_changes_name_and_returns_post_update_row() {
    let mut repo = repo();
    let created = repo.add(NewScheme::new("old")).unwrap();
    let updated = repo
        .update(SchemeChanges { scheme_name: Some("new".into()) }, created.id)
        .unwrap()
        .expect("row should still exist");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.scheme_name, "new");
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn update_missing_id_resolves_none() {
    let mut repo = repo();
    let out = repo.update(SchemeChanges { scheme_name: Some("x".into()) }, 404).unwrap();
    assert_eq!(out, None);
}

#[test]
fn update_with_empty_changes_is_a_read() {
    let mut repo = repo();
    let created = repo.add(NewScheme::new("untouched")).unwrap();
    let out = repo.update(SchemeChanges::default(), created.id).unwrap();
    assert_eq!(out, Some(created));
}

#[test]
fn remove_returns_pre_delete_snapshot_then_row_is_gone() {
    let mut repo = repo();
    let created = repo.add(NewScheme::new("doomed")).unwrap();
    repo.add_step(NewStep::new(1, "quest"), created.id).unwrap();

    let removed = repo.remove(created.id).unwrap();
    assert_eq!(removed, Some(created.clone()));
    assert_eq!(repo.find_by_id(created.id).unwrap(), None);
    // la cascada se llevó los steps
    assert!(repo.find_steps(created.id).unwrap().is_empty());
}

#[test]
fn remove_missing_id_returns_none_and_leaves_rows() {
    let mut repo = repo();
    let kept = repo.add(NewScheme::new("keeper")).unwrap();
    assert_eq!(repo.remove(kept.id + 100).unwrap(), None);
    assert_eq!(repo.find().unwrap(), vec![kept]);
}

#[test]
fn add_step_for_unknown_scheme_surfaces_constraint_error() {
    let mut repo = repo();
    // sin validación en esta capa: la FK de la base es la que habla
    let err = repo.add_step(NewStep::new(1, "quest"), 404).unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)), "got: {err:?}");
}
