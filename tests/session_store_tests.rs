use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use telecom_portal::{
    models::{AuthResponse, Profile, UserRecord},
    session::{NewSession, SessionError, SessionStore, keys},
    storage::{
        KeyValueStorage, MemoryStorage, MockStorage, StorageError, StorageHandle, StorageRegistry,
    },
};
use uuid::Uuid;

// --- Helpers ---

fn profile() -> Profile {
    Profile {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.com".into(),
        mobile: "9876543210".into(),
        ..Profile::default()
    }
}

fn new_session(role: &str) -> NewSession {
    NewSession {
        credential_token: "t1".into(),
        role: role.into(),
        user_id: 42,
        profile: profile(),
    }
}

fn memory_store() -> (StorageHandle, SessionStore) {
    let storage: StorageHandle = Arc::new(MemoryStorage::new());
    (storage.clone(), SessionStore::new(storage))
}

/// Records every batch the store issues, then forwards it to a real partition.
#[derive(Default)]
struct RecordingStorage {
    inner: MemoryStorage,
    writes: Mutex<Vec<Vec<String>>>,
    removals: Mutex<Vec<Vec<String>>>,
}

impl KeyValueStorage for RecordingStorage {
    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        self.inner.get_items(keys)
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        self.writes
            .lock()
            .unwrap()
            .push(items.iter().map(|(key, _)| key.to_string()).collect());
        self.inner.set_items(items)
    }

    fn remove_items(&self, keys: &[&str]) {
        self.removals
            .lock()
            .unwrap()
            .push(keys.iter().map(|key| key.to_string()).collect());
        self.inner.remove_items(keys);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

// --- Tests ---

#[test]
fn test_set_then_get_round_trips_every_field() {
    let (_, store) = memory_store();
    store.set(&new_session("ADMIN")).unwrap();

    let session = store.get();
    assert_eq!(session.credential_token.as_deref(), Some("t1"));
    assert_eq!(session.role.as_deref(), Some("ADMIN"));
    assert_eq!(session.user_id, Some(42));
    assert_eq!(session.profile, Some(profile()));
    assert!(session.is_authenticated());
}

#[test]
fn test_session_from_auth_response() {
    let response = AuthResponse {
        token: "t9".into(),
        user: UserRecord {
            id: 9,
            role: Some("EMPLOYEE".into()),
            profile: profile(),
        },
    };
    let session = NewSession::from(response);
    assert_eq!(session.credential_token, "t9");
    assert_eq!(session.role, "EMPLOYEE");
    assert_eq!(session.user_id, 9);
}

#[test]
fn test_clear_is_idempotent() {
    let (storage, store) = memory_store();
    store.set(&new_session("USER")).unwrap();

    store.clear();
    let after_first = store.get();
    store.clear();
    let after_second = store.get();

    assert!(after_first.is_empty());
    assert_eq!(after_first, after_second);
    for key in keys::ALL {
        assert_eq!(storage.get_item(key), None);
    }
}

#[test]
fn test_clear_on_empty_partition_is_noop() {
    let (_, store) = memory_store();
    store.clear();
    assert!(store.get().is_empty());
}

#[test]
fn test_failed_write_leaves_no_partial_session() {
    let storage = Arc::new(MockStorage::new_failing());
    let store = SessionStore::new(storage.clone());

    let result = store.set(&new_session("USER"));
    assert!(matches!(
        result,
        Err(SessionError::Write(StorageError::Unavailable))
    ));
    assert!(store.get().is_empty());
}

#[test]
fn test_write_failing_midway_rolls_back_earlier_fields() {
    // The batch carrying token and role is refused because of the profile
    let storage = Arc::new(MockStorage::failing_on(keys::PROFILE));
    let store = SessionStore::new(storage.clone());

    let result = store.set(&new_session("USER"));
    match result {
        Err(SessionError::Write(StorageError::Rejected(key))) => assert_eq!(key, keys::PROFILE),
        other => panic!("expected a write error, got {other:?}"),
    }
    assert_eq!(storage.get_item(keys::TOKEN), None);
    assert_eq!(storage.get_item(keys::ROLE), None);
    assert_eq!(storage.get_item(keys::USER_ID), None);
    assert!(!store.get().is_authenticated());
}

#[test]
fn test_get_tolerates_corrupt_fields() {
    let (storage, store) = memory_store();
    storage.set_item(keys::TOKEN, "t1").unwrap();
    storage.set_item(keys::USER_ID, "not-a-number").unwrap();
    storage.set_item(keys::PROFILE, "{broken").unwrap();

    let session = store.get();
    assert!(session.is_authenticated());
    assert_eq!(session.user_id, None);
    assert_eq!(session.profile, None);
}

#[test]
fn test_update_profile_replaces_snapshot_only() {
    let (_, store) = memory_store();
    store.set(&new_session("USER")).unwrap();

    let updated = Profile {
        address: Some("12 Lake Road".into()),
        ..profile()
    };
    store.update_profile(&updated).unwrap();

    let session = store.get();
    assert_eq!(session.profile, Some(updated));
    assert_eq!(session.credential_token.as_deref(), Some("t1"));
    assert_eq!(session.user_id, Some(42));
}

#[test]
fn test_set_and_clear_each_issue_one_batch() {
    let storage = Arc::new(RecordingStorage::default());
    let store = SessionStore::new(storage.clone());

    store.set(&new_session("ADMIN")).unwrap();
    store.clear();

    let writes = storage.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0], keys::ALL.map(String::from));

    let removals = storage.removals.lock().unwrap();
    assert_eq!(removals.len(), 1);
    assert_eq!(removals[0], keys::ALL.map(String::from));
}

#[test]
fn test_reader_never_sees_token_without_role() {
    let storage: StorageHandle = Arc::new(MemoryStorage::new());
    let writer = SessionStore::new(storage.clone());
    let reader = SessionStore::new(storage);
    let done = Arc::new(AtomicBool::new(false));

    let observer = {
        let done = done.clone();
        thread::spawn(move || {
            let mut torn = 0;
            while !done.load(Ordering::Acquire) {
                let session = reader.get();
                if session.credential_token.is_some() != session.role.is_some()
                    || session.credential_token.is_some() != session.profile.is_some()
                {
                    torn += 1;
                }
            }
            torn
        })
    };

    for _ in 0..2_000 {
        writer.set(&new_session("USER")).unwrap();
        writer.clear();
    }
    done.store(true, Ordering::Release);

    assert_eq!(observer.join().unwrap(), 0);
}

#[test]
fn test_registry_partition_created_on_login_and_dropped_on_logout() {
    let registry = StorageRegistry::new();
    let store = SessionStore::new(registry.partition(Uuid::new_v4()));

    assert!(store.get().is_empty());
    assert!(registry.is_empty());

    store.set(&new_session("USER")).unwrap();
    assert_eq!(registry.len(), 1);

    store.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_refused_login_write_leaves_no_partition() {
    let registry =
        StorageRegistry::with_factory(|| Arc::new(MockStorage::new_failing()) as StorageHandle);
    let store = SessionStore::new(registry.partition(Uuid::new_v4()));

    assert!(store.set(&new_session("USER")).is_err());
    assert!(registry.is_empty());
}
