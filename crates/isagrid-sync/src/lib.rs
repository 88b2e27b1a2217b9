//! Backend synchronization for sample sheet grids.
//!
//! [`ConfigSyncClient`] keeps the display and edit configuration documents
//! and queues optimistic updates; the traits in [`collaborators`] describe
//! every backend call the grid makes.

pub mod client;
pub mod collaborators;
pub mod error;
pub mod rows;
pub mod update;

pub use client::{
    ConfigSyncClient, FieldSyncState, PendingUpdate, SyncNotification, SyncOutcome, Ticket,
};
pub use collaborators::{
    ConfigBackend, FileProbe, ProbeResult, RowBackend, SheetPayload, SheetSource, TermSearch,
    apply_probe, linked_paths, search_allowed,
};
pub use error::{Result, SyncError};
pub use rows::{delete_row, persist_unsaved_row, push_cell_update};
pub use update::{ConfigAction, ConfigDocument, ConfigSnapshot, ConfigUpdate, ConfigUpdateBatch};
