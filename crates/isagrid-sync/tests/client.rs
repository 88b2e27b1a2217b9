//! Tests for the configuration sync client.

use isagrid_model::{FieldEditConfig, FieldTarget};
use isagrid_sync::{
    ConfigAction, ConfigBackend, ConfigDocument, ConfigSnapshot, ConfigSyncClient,
    ConfigUpdateBatch, FieldSyncState, Result, SyncError, SyncOutcome,
};

#[derive(Default)]
struct RecordingBackend {
    batches: Vec<ConfigUpdateBatch>,
    refuse: bool,
}

impl ConfigBackend for RecordingBackend {
    fn update_config(&mut self, batch: &ConfigUpdateBatch) -> Result<()> {
        self.batches.push(batch.clone());
        if self.refuse {
            return Err(SyncError::Rejected("configuration is read-only".to_string()));
        }
        Ok(())
    }

    fn fetch_config(&self) -> Result<ConfigSnapshot> {
        Ok(ConfigSnapshot::default())
    }
}

fn age() -> FieldTarget {
    FieldTarget::study("s1", 0, 2)
}

#[test]
fn first_write_inserts_and_later_writes_update() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    let first = client.update_field(&age(), FieldEditConfig::new("Age"));
    let second = client.update_field(&age(), FieldEditConfig::new("Age").read_only());

    let actions: Vec<ConfigAction> = [&first, &second]
        .iter()
        .map(|pending| match &pending.batch {
            ConfigUpdateBatch::Edit(updates) => updates[0].action,
            ConfigUpdateBatch::Display(updates) => updates[0].action,
        })
        .collect();
    assert_eq!(actions, vec![ConfigAction::Insert, ConfigAction::Update]);
    assert_eq!(
        client.field_state(ConfigDocument::Edit, &age()),
        Some(&FieldSyncState::Pending {
            ticket: second.ticket
        })
    );
    assert!(
        client
            .edit_config()
            .field(&age())
            .is_some_and(|field| !field.editable)
    );
    assert_eq!(client.pending().count(), 2);
}

#[test]
fn writes_land_at_their_own_field_index() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    client.update_field(&age(), FieldEditConfig::new("Age"));
    assert!(client.edit_config().field(&FieldTarget::study("s1", 0, 0)).is_none());
    assert!(client.edit_config().matching_field(&age(), "Age").is_some());

    let name = FieldTarget::study("s1", 0, 0);
    let first = client.update_field(&name, FieldEditConfig::new("Name"));
    match &first.batch {
        ConfigUpdateBatch::Edit(updates) => assert_eq!(updates[0].action, ConfigAction::Insert),
        ConfigUpdateBatch::Display(_) => panic!("expected an edit batch"),
    }
    assert!(client.delete_field(&name).is_some());
    assert!(client.edit_config().matching_field(&age(), "Age").is_some());
}

#[test]
fn confirmed_writes_leave_no_state_behind() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    let mut backend = RecordingBackend::default();
    for field_index in 0..50 {
        client.set_visible(&FieldTarget::study("s1", 0, field_index), "Age", true);
    }
    assert!(client.flush(&mut backend).is_empty());
    assert_eq!(backend.batches.len(), 50);
    assert!(
        (0..50).all(|field_index| client
            .field_state(ConfigDocument::Display, &FieldTarget::study("s1", 0, field_index))
            .is_none())
    );
}

#[test]
fn late_answers_do_not_clobber_newer_writes() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    let first = client.update_field(&age(), FieldEditConfig::new("Age"));
    let second = client.update_field(&age(), FieldEditConfig::new("Age").with_default("1"));
    assert_eq!(client.take_pending().len(), 2);
    assert_eq!(client.pending().count(), 0);

    assert_eq!(client.resolve(second.ticket, SyncOutcome::Success), None);
    assert_eq!(
        client.resolve(first.ticket, SyncOutcome::Failure("timeout".to_string())),
        None
    );
    assert_eq!(client.field_state(ConfigDocument::Edit, &age()), None);
    assert_eq!(
        client
            .edit_config()
            .field(&age())
            .and_then(|field| field.default.as_deref()),
        Some("1")
    );
    // Answering twice is ignored.
    assert_eq!(
        client.resolve(second.ticket, SyncOutcome::Failure("again".to_string())),
        None
    );
}

#[test]
fn rejected_visibility_change_is_reported() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    let pending = client.set_visible(&age(), "Age", false);
    let notification = client
        .resolve(pending.ticket, SyncOutcome::Failure("forbidden".to_string()))
        .expect("notification");
    assert_eq!(notification.document, ConfigDocument::Display);
    assert_eq!(notification.targets, vec![age()]);
    assert_eq!(notification.message, "forbidden");
    assert_eq!(
        client.field_state(ConfigDocument::Display, &age()),
        Some(&FieldSyncState::Rejected {
            reason: "forbidden".to_string()
        })
    );
    assert!(
        client
            .display_config()
            .field(&age())
            .is_some_and(|field| !field.visible)
    );
    assert_eq!(client.field_state(ConfigDocument::Edit, &age()), None);
}

#[test]
fn flush_sends_queued_batches_in_order() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    client.update_field(&age(), FieldEditConfig::new("Age"));
    client.set_visible(&age(), "Age", true);
    let mut backend = RecordingBackend::default();
    assert!(client.flush(&mut backend).is_empty());
    let documents: Vec<ConfigDocument> = backend
        .batches
        .iter()
        .map(ConfigUpdateBatch::document)
        .collect();
    assert_eq!(documents, vec![ConfigDocument::Edit, ConfigDocument::Display]);
    assert_eq!(client.field_state(ConfigDocument::Display, &age()), None);

    let mut refusing = RecordingBackend {
        refuse: true,
        ..RecordingBackend::default()
    };
    client.update_field(&age(), FieldEditConfig::new("Age").read_only());
    let notifications = client.flush(&mut refusing);
    assert_eq!(notifications.len(), 1);
    insta::assert_snapshot!(
        notifications[0].message,
        @"backend rejected the request: configuration is read-only"
    );
}

#[test]
fn delete_only_queues_existing_entries() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    assert!(client.delete_field(&age()).is_none());
    client.update_field(&age(), FieldEditConfig::new("Age"));
    let pending = client.delete_field(&age()).expect("delete queued");
    match &pending.batch {
        ConfigUpdateBatch::Edit(updates) => {
            assert_eq!(updates[0].action, ConfigAction::Delete);
            assert!(updates[0].config.is_none());
        }
        ConfigUpdateBatch::Display(_) => panic!("expected an edit batch"),
    }
    assert!(client.edit_config().field(&age()).is_none());
}

#[test]
fn reconcile_drops_outstanding_state() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    let pending = client.update_field(&age(), FieldEditConfig::new("Age"));
    let mut snapshot = ConfigSnapshot::default();
    snapshot
        .edit_config
        .set_field(&age(), FieldEditConfig::new("Age").read_only());
    client.reconcile(snapshot);

    assert_eq!(client.pending().count(), 0);
    assert_eq!(client.field_state(ConfigDocument::Edit, &age()), None);
    assert_eq!(client.resolve(pending.ticket, SyncOutcome::Success), None);
    assert!(
        client
            .edit_config()
            .field(&age())
            .is_some_and(|field| !field.editable)
    );
}

#[test]
fn batches_serialize_with_document_tag() {
    let mut client = ConfigSyncClient::new(ConfigSnapshot::default());
    let pending = client.set_visible(&FieldTarget::assay("s1", "a1", 1, 0), "Name", false);
    insta::assert_snapshot!(
        serde_json::to_string(&pending.batch).expect("serialize"),
        @r#"{"document":"display","updates":[{"action":"insert","study":"s1","assay":"a1","nodeIndex":1,"fieldIndex":0,"config":{"name":"Name","visible":false}}]}"#
    );
    let parsed: ConfigUpdateBatch =
        serde_json::from_str(&serde_json::to_string(&pending.batch).expect("serialize"))
            .expect("parse");
    assert_eq!(parsed.targets(), vec![FieldTarget::assay("s1", "a1", 1, 0)]);
}
