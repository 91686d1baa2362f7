use dashstore::DashStore;
use typestore::{MemoryStore, Store, StoreError};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: u32,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct AuditEntry {
    code: String,
}

fn person(id: u32, name: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
    }
}

fn sorted_ids(list: &[Person]) -> Vec<u32> {
    let mut ids: Vec<u32> = list.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn add_then_get_list_round_trips() {
    let store = DashStore::new();
    store.add("people", person(1, "ada")).unwrap();
    store.add("people", person(2, "grace")).unwrap();

    let list = store.get_list::<Person>("people").unwrap().unwrap();
    assert_eq!(sorted_ids(&list), [1, 2]);
}

#[test]
fn key_type_locks_at_first_insertion() {
    let store = DashStore::new();
    store.add("A", person(1, "ada")).unwrap();
    store.add("A", person(2, "grace")).unwrap();

    let err = store
        .add(
            "A",
            AuditEntry {
                code: "x".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::TypeConflict { .. }));

    let list = store.get_list::<Person>("A").unwrap().unwrap();
    assert_eq!(sorted_ids(&list), [1, 2]);

    let drained = store.safe_dispose::<Person>("A").unwrap().unwrap();
    assert_eq!(sorted_ids(&drained), [1, 2]);
    assert!(store.get_list::<Person>("A").unwrap().is_none());

    // the drained key accepts a brand-new type
    store
        .add(
            "A",
            AuditEntry {
                code: "y".to_string(),
            },
        )
        .unwrap();
}

#[test]
fn empty_batch_is_rejected() {
    let store = DashStore::new();
    let err = store.add_range::<Person>("people", Vec::new()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { .. }));
    assert!(store.get_list::<Person>("people").unwrap().is_none());
}

#[test]
fn conflicting_batch_appends_nothing() {
    let store = DashStore::new();
    store.add("people", person(1, "ada")).unwrap();

    let err = store
        .add_range(
            "people",
            vec![AuditEntry {
                code: "a".to_string(),
            }],
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::TypeConflict { .. }));

    let list = store.get_list::<Person>("people").unwrap().unwrap();
    assert_eq!(list.len(), 1);
}

#[test]
fn update_in_place_touches_exactly_the_matching_elements() {
    let store = DashStore::new();
    store
        .add_range(
            "people",
            vec![person(1, "ada"), person(2, "grace"), person(3, "edsger")],
        )
        .unwrap();

    store
        .update(
            "people",
            |p: &Person| p.id == 2,
            |p| p.name = "renamed".to_string(),
        )
        .unwrap();

    let list = store.get_list::<Person>("people").unwrap().unwrap();
    let renamed: Vec<&Person> = list.iter().filter(|p| p.name == "renamed").collect();
    assert_eq!(renamed.len(), 1);
    assert_eq!(renamed[0].id, 2);
}

#[test]
fn update_replace_swaps_exactly_the_matching_elements() {
    let store = DashStore::new();
    store
        .add_range(
            "people",
            vec![person(1, "ada"), person(2, "grace"), person(3, "edsger")],
        )
        .unwrap();

    store
        .update_replace("people", |p: &Person| p.id > 1, person(0, "placeholder"))
        .unwrap();

    let list = store.get_list::<Person>("people").unwrap().unwrap();
    assert_eq!(sorted_ids(&list), [0, 0, 1]);
}

#[test]
fn update_replace_on_missing_key_is_a_noop() {
    let store = DashStore::new();
    store
        .update_replace("nobody", |_: &Person| true, person(0, "x"))
        .unwrap();
    assert!(store.get_list::<Person>("nobody").unwrap().is_none());
}

#[test]
fn removing_everything_forgets_the_type() {
    let store = DashStore::new();
    store
        .add_range("people", vec![person(1, "ada"), person(2, "grace")])
        .unwrap();

    store.remove("people", |_: &Person| true).unwrap();
    assert!(store.get_list::<Person>("people").unwrap().is_none());

    store
        .add(
            "people",
            AuditEntry {
                code: "fresh".to_string(),
            },
        )
        .unwrap();
}

#[test]
fn partial_remove_keeps_the_rest() {
    let store = DashStore::new();
    store
        .add_range(
            "people",
            vec![person(1, "ada"), person(2, "grace"), person(3, "edsger")],
        )
        .unwrap();

    store.remove("people", |p: &Person| p.id == 2).unwrap();

    let list = store.get_list::<Person>("people").unwrap().unwrap();
    assert_eq!(sorted_ids(&list), [1, 3]);
}

#[test]
fn safe_dispose_with_wrong_type_keeps_the_key() {
    let store = DashStore::new();
    store.add("people", person(1, "ada")).unwrap();

    let err = store.safe_dispose::<AuditEntry>("people").unwrap_err();
    assert!(matches!(err, StoreError::TypeConflict { .. }));
    assert_eq!(store.get_list::<Person>("people").unwrap().unwrap().len(), 1);
}

#[test]
fn dispose_discards_values() {
    let store = DashStore::new();
    store.add("people", person(1, "ada")).unwrap();

    store.dispose("people");
    assert!(store.get_list::<Person>("people").unwrap().is_none());
    store.dispose("people");
}

// Both implementations behave identically behind the shared contract.
#[test]
fn shared_contract_parity() {
    fn exercise<S: Store>(store: &mut S) {
        store.add("k", person(1, "ada")).unwrap();
        store
            .add_range("k", vec![person(2, "grace"), person(3, "edsger")])
            .unwrap();

        let err = store
            .add(
                "k",
                AuditEntry {
                    code: "x".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeConflict { .. }));

        store.remove("k", |p: &Person| p.id == 1).unwrap();
        store
            .update("k", |p: &Person| p.id == 2, |p| p.id = 20)
            .unwrap();

        let list = store.safe_dispose::<Person>("k").unwrap().unwrap();
        assert_eq!(sorted_ids(&list), [3, 20]);
        assert!(store.get_list::<Person>("k").unwrap().is_none());
    }

    exercise(&mut MemoryStore::new());
    exercise(&mut DashStore::new());
}
