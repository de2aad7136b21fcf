pub mod board;
pub mod card;
pub mod custom;
pub mod policy;
pub mod task;

pub use board::{build_board, Board, Column};
pub use card::{Card, CardId, ColumnId, Domain};
pub use custom::{
    CustomBoardState, CustomColumn, CustomColumnId, CustomTag, CustomTask, CustomTaskId,
    NewCustomTask, RepairReport,
};
pub use policy::{decide, Decision};
pub use task::{MaintenanceTask, Priority, TaskId, TaskStatus};
