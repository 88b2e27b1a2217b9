//! Config sync client.
//!
//! Configuration changes are applied to the local documents immediately and
//! queued as [`PendingUpdate`]s. Each change bumps a per-field sequence
//! number; a backend answer only affects a field whose latest write is the
//! one the answer is about, so late or reordered answers never clobber newer
//! local state. A fetched [`ConfigSnapshot`] replaces everything.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::{debug, info, warn};

use isagrid_model::{DisplayConfig, DisplayField, EditConfig, FieldEditConfig, FieldTarget};

use crate::collaborators::ConfigBackend;
use crate::update::{ConfigAction, ConfigDocument, ConfigSnapshot, ConfigUpdate, ConfigUpdateBatch};

/// Handle of one queued batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub ticket: Ticket,
    pub batch: ConfigUpdateBatch,
}

/// Backend answer to one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Success,
    Failure(String),
}

/// Sync state of a field with unconfirmed or refused writes. Fields in sync
/// with the backend have no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FieldSyncState {
    Pending { ticket: Ticket },
    /// The backend refused the change. The local value stays until the next
    /// snapshot reconciles it.
    Rejected { reason: String },
}

/// Failed update reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncNotification {
    pub ticket: Ticket,
    pub document: ConfigDocument,
    pub targets: Vec<FieldTarget>,
    pub message: String,
}

#[derive(Debug, Clone)]
struct FieldState {
    seq: u64,
    status: FieldSyncState,
}

#[derive(Debug, Clone)]
struct InFlight {
    document: ConfigDocument,
    writes: Vec<(FieldTarget, u64)>,
}

type FieldKey = (ConfigDocument, FieldTarget);

#[derive(Debug, Default)]
pub struct ConfigSyncClient {
    edit_config: EditConfig,
    display_config: DisplayConfig,
    next_ticket: u64,
    next_seq: u64,
    fields: BTreeMap<FieldKey, FieldState>,
    in_flight: BTreeMap<Ticket, InFlight>,
    outbox: VecDeque<PendingUpdate>,
}

impl ConfigSyncClient {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            edit_config: snapshot.edit_config,
            display_config: snapshot.display_config,
            ..Self::default()
        }
    }

    pub fn edit_config(&self) -> &EditConfig {
        &self.edit_config
    }

    pub fn display_config(&self) -> &DisplayConfig {
        &self.display_config
    }

    pub fn field_state(&self, document: ConfigDocument, target: &FieldTarget) -> Option<&FieldSyncState> {
        self.fields
            .get(&(document, target.clone()))
            .map(|state| &state.status)
    }

    /// Batches queued but not yet handed to a backend.
    pub fn pending(&self) -> impl Iterator<Item = &PendingUpdate> {
        self.outbox.iter()
    }

    /// Hand the queued batches to the caller, who reports each answer through
    /// [`resolve`](Self::resolve).
    pub fn take_pending(&mut self) -> Vec<PendingUpdate> {
        self.outbox.drain(..).collect()
    }

    /// Store an edit configuration entry and queue it.
    pub fn update_field(&mut self, target: &FieldTarget, config: FieldEditConfig) -> PendingUpdate {
        let action = if self.edit_config.field(target).is_some() {
            ConfigAction::Update
        } else {
            ConfigAction::Insert
        };
        self.edit_config.set_field(target, config.clone());
        let batch = ConfigUpdateBatch::Edit(vec![ConfigUpdate::new(action, target, Some(config))]);
        self.enqueue(batch)
    }

    /// Remove an edit configuration entry; `None` when there was none.
    pub fn delete_field(&mut self, target: &FieldTarget) -> Option<PendingUpdate> {
        self.edit_config.remove_field(target)?;
        let batch = ConfigUpdateBatch::Edit(vec![ConfigUpdate::new(
            ConfigAction::Delete,
            target,
            None,
        )]);
        Some(self.enqueue(batch))
    }

    /// Store a column visibility and queue it.
    pub fn set_visible(&mut self, target: &FieldTarget, name: &str, visible: bool) -> PendingUpdate {
        let action = if self.display_config.field(target).is_some() {
            ConfigAction::Update
        } else {
            ConfigAction::Insert
        };
        let field = DisplayField {
            name: name.to_string(),
            visible,
        };
        self.display_config.set_field(target, field.clone());
        let batch =
            ConfigUpdateBatch::Display(vec![ConfigUpdate::new(action, target, Some(field))]);
        self.enqueue(batch)
    }

    /// Apply a backend answer.
    ///
    /// Unknown tickets (already resolved, or issued before a reconcile) are
    /// ignored. A failure is reported only for fields the batch still owns.
    pub fn resolve(&mut self, ticket: Ticket, outcome: SyncOutcome) -> Option<SyncNotification> {
        let Some(flight) = self.in_flight.remove(&ticket) else {
            debug!(ticket = ticket.id(), "ignoring answer for unknown ticket");
            return None;
        };
        let mut affected = Vec::new();
        for (target, seq) in flight.writes {
            let key = (flight.document, target);
            let Some(state) = self.fields.get_mut(&key) else {
                continue;
            };
            if state.seq != seq {
                debug!(ticket = ticket.id(), "answer superseded by a newer write");
                continue;
            }
            match &outcome {
                SyncOutcome::Success => {
                    self.fields.remove(&key);
                }
                SyncOutcome::Failure(reason) => {
                    state.status = FieldSyncState::Rejected {
                        reason: reason.clone(),
                    };
                    affected.push(key.1);
                }
            }
        }
        match outcome {
            SyncOutcome::Success => None,
            SyncOutcome::Failure(message) => {
                warn!(ticket = ticket.id(), %message, "config update rejected");
                (!affected.is_empty()).then_some(SyncNotification {
                    ticket,
                    document: flight.document,
                    targets: affected,
                    message,
                })
            }
        }
    }

    /// Send every queued batch and resolve it with the backend's answer.
    pub fn flush<B: ConfigBackend + ?Sized>(&mut self, backend: &mut B) -> Vec<SyncNotification> {
        let mut notifications = Vec::new();
        for pending in self.take_pending() {
            let outcome = match backend.update_config(&pending.batch) {
                Ok(()) => SyncOutcome::Success,
                Err(error) => SyncOutcome::Failure(error.to_string()),
            };
            notifications.extend(self.resolve(pending.ticket, outcome));
        }
        notifications
    }

    /// Replace local state with a fetched snapshot.
    ///
    /// Outstanding tickets become unknown; the caller rebuilds the column
    /// layout from the new documents.
    pub fn reconcile(&mut self, snapshot: ConfigSnapshot) {
        let dropped = self.in_flight.len() + self.outbox.len();
        self.edit_config = snapshot.edit_config;
        self.display_config = snapshot.display_config;
        self.fields.clear();
        self.in_flight.clear();
        self.outbox.clear();
        info!(dropped, "configuration reconciled from snapshot");
    }

    fn enqueue(&mut self, batch: ConfigUpdateBatch) -> PendingUpdate {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let document = batch.document();
        let mut writes = Vec::with_capacity(batch.len());
        for target in batch.targets() {
            self.next_seq += 1;
            self.fields.insert(
                (document, target.clone()),
                FieldState {
                    seq: self.next_seq,
                    status: FieldSyncState::Pending { ticket },
                },
            );
            writes.push((target, self.next_seq));
        }
        self.in_flight.insert(ticket, InFlight { document, writes });
        let pending = PendingUpdate { ticket, batch };
        self.outbox.push_back(pending.clone());
        debug!(ticket = ticket.id(), ?document, "config update queued");
        pending
    }
}
