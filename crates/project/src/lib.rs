//! View-node hierarchy for the solution explorer (solution → projects → file groups → files).
//! 方案總管的檢視節點階層（方案 → 專案 → 檔案群組 → 檔案）。

pub mod config;
pub mod icons;
pub mod registry;
pub mod tree;
pub mod tree_item;

pub use config::{ConfigError, ExplorerConfig};
pub use icons::Icon;
pub use registry::{FileNodeHandle, FileNodeRegistry};
pub use tree::{
    create_top_level, CollapsibleState, ItemType, NodeRef, OpenFileCommand, ProjectViewError,
    ProjectViewTree, TreeFactory, ViewNodeId, GROUP_KEY_SEPARATOR,
};
pub use tree_item::{CommandDescriptor, TreeItem, TreeItemNode};
