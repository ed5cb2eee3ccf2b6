use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::tree::{CollapsibleState, ItemType, NodeRef, ProjectViewTree, ViewNodeId};

/// Command payload handed to the host when an item is invoked.
/// 項目被觸發時交給宿主的指令內容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub command: String,
    pub title: String,
    pub arguments: Vec<String>,
}

/// Presentation record a host tree widget renders for one node.
/// 宿主樹狀元件為單一節點呈現的資料。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem {
    pub node: ViewNodeId,
    pub id: String,
    pub label: String,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub collapsible_state: CollapsibleState,
    pub icon_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandDescriptor>,
}

impl TreeItem {
    pub fn from_node(node: NodeRef<'_>, config: &ExplorerConfig) -> Self {
        let command = node.command().map(|open| CommandDescriptor {
            command: open.command.clone(),
            title: open.title.clone(),
            arguments: vec![open.identity_key.clone()],
        });
        Self {
            node: node.id(),
            id: node.identity_key().to_string(),
            label: node.label().to_string(),
            item_type: node.item_type(),
            tooltip: node.tooltip().map(str::to_string),
            collapsible_state: node.collapsible_state(),
            icon_path: node.icon().path_in(&config.icon_root),
            command,
        }
    }
}

/// A [`TreeItem`] with its rendered children, for whole-tree dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItemNode {
    #[serde(flatten)]
    pub item: TreeItem,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeItemNode>,
}

impl TreeItemNode {
    pub fn from_node(node: NodeRef<'_>, config: &ExplorerConfig) -> Self {
        Self {
            item: TreeItem::from_node(node, config),
            children: node
                .children()
                .map(|child| TreeItemNode::from_node(child, config))
                .collect(),
        }
    }
}

impl ProjectViewTree {
    pub fn tree_item(&self, id: ViewNodeId, config: &ExplorerConfig) -> Option<TreeItem> {
        self.node(id).map(|node| TreeItem::from_node(node, config))
    }

    pub fn tree_items(&self, config: &ExplorerConfig) -> TreeItemNode {
        TreeItemNode::from_node(self.root(), config)
    }
}
