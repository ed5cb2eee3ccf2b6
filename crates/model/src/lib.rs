//! Read-only domain model consumed by the solution explorer view.
//! 方案總管檢視所讀取的唯讀領域模型。

pub mod entity;
pub mod snapshot;

pub use entity::{File, FileGroup, ModelRef, NullModel, Project};
pub use snapshot::{SnapshotError, SnapshotStore, SolutionSnapshot};
