//! # PMS Board Core
//!
//! Board logic for planned-maintenance task tracking.
//!
//! Backend maintenance tasks are laid out in fixed status columns next to
//! locally stored custom columns. This crate decides which drag gestures are
//! legal status transitions, keeps the custom board consistent on the
//! device, and merges both into one board, without depending on a specific
//! UI or task backend.

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod selection;
pub mod service;
pub mod session;
pub mod storage;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::{Config, StorageBackend};
pub use controller::{
    Acknowledgement, DragController, DropOutcome, DropTarget, Notice, NoticeLevel,
    PendingTransition, TransitionOutcome,
};
pub use domain::{
    board::{build_board, Board, Column},
    card::{Card, CardId, ColumnId, Domain},
    custom::{CustomColumn, CustomColumnId, CustomTag, CustomTask, CustomTaskId, NewCustomTask},
    policy::{decide, Decision},
    task::{MaintenanceTask, Priority, TaskId, TaskStatus},
};
pub use error::{BoardError, Result};
pub use selection::{BulkDeleteReport, BulkSelection};
pub use service::{InMemoryTaskService, TaskService};
pub use session::BoardSession;
pub use storage::{CustomStateStorage, FileStorage, InMemoryStorage};
pub use store::CustomBoardStore;
