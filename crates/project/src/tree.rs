use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use solution_explorer_model::{File, FileGroup, ModelRef, NullModel, Project};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::ExplorerConfig;
use crate::icons::Icon;
use crate::registry::FileNodeRegistry;

/// Joins a project's full name and a group name into the group's identity key.
pub const GROUP_KEY_SEPARATOR: &str = "_";

/// Index of a node inside its [`ProjectViewTree`] arena.
/// 節點在 [`ProjectViewTree`] 陣列中的索引。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewNodeId(usize);

impl ViewNodeId {
    pub const ROOT: ViewNodeId = ViewNodeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant used by hosts to branch on node behaviour.
/// 供宿主依節點類型分派行為的判別值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    TopLevel,
    Project,
    FileGroup,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapsibleState {
    None,
    Collapsed,
}

/// Everything the "open file" collaborator needs to act on a file node.
/// 「開啟檔案」協作者處理檔案節點所需的資訊。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFileCommand {
    pub command: String,
    pub title: String,
    pub identity_key: String,
    pub file: Arc<File>,
}

#[derive(Debug, Clone)]
enum NodeBinding {
    TopLevel {
        children: Vec<ViewNodeId>,
    },
    Project {
        project: Arc<Project>,
        children: Vec<ViewNodeId>,
    },
    FileGroup {
        group: Arc<FileGroup>,
        children: Vec<ViewNodeId>,
    },
    File {
        file: Arc<File>,
        command: OpenFileCommand,
    },
}

#[derive(Debug, Clone)]
struct ViewNode {
    label: String,
    tooltip: Option<String>,
    identity_key: String,
    icon: Icon,
    parent: Option<ViewNodeId>,
    binding: NodeBinding,
}

/// Fully materialized solution tree. Immutable once built.
/// 完整建立的方案樹，建立後即不可變。
#[derive(Debug, Clone)]
pub struct ProjectViewTree {
    generation: u64,
    nodes: Vec<ViewNode>,
    file_index: HashMap<String, ViewNodeId>,
}

impl ProjectViewTree {
    /// Builds the whole tree eagerly without publishing it anywhere.
    /// 一次建立整棵樹，但不發佈至任何註冊表。
    pub fn build(
        root_name: &str,
        projects: &[Arc<Project>],
        config: &ExplorerConfig,
    ) -> Result<Self, ProjectViewError> {
        let mut builder = TreeBuilder::new(config);
        builder.top_level(root_name, projects)?;
        debug!(
            root = root_name,
            projects = projects.len(),
            nodes = builder.nodes.len(),
            files = builder.file_index.len(),
            "built project view tree"
        );
        Ok(Self {
            generation: 0,
            nodes: builder.nodes,
            file_index: builder.file_index,
        })
    }

    /// Registry generation this tree was published under; 0 when unpublished.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: ViewNodeId::ROOT,
        }
    }

    pub fn node(&self, id: ViewNodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    pub(crate) fn node_ref(&self, id: ViewNodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Finds the file node registered under a fully-qualified file name.
    /// 依完整檔名尋找已登錄的檔案節點。
    pub fn find_file(&self, full_name: &str) -> Option<NodeRef<'_>> {
        self.file_index
            .get(full_name)
            .map(|id| NodeRef { tree: self, id: *id })
    }

    pub fn file_count(&self) -> usize {
        self.file_index.len()
    }

    /// Visits every node depth-first in display order.
    /// 以顯示順序深度優先走訪所有節點。
    pub fn walk(&self) -> Vec<NodeRef<'_>> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ViewNodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = NodeRef { tree: self, id };
            stack.extend(node.child_ids().iter().rev().copied());
            visited.push(node);
        }
        visited
    }

    /// Ids of every ancestor of `id`, root first, excluding `id` itself.
    /// 節點所有祖先的識別碼（由根開始，不含自身）。
    pub fn ancestors(&self, id: ViewNodeId) -> Option<Vec<ViewNodeId>> {
        let mut chain = self.reveal_path(id)?;
        chain.pop();
        Some(chain)
    }

    /// Ids a host expands to reveal `id`, root first and ending at `id`.
    /// 宿主為顯示節點需依序展開的識別碼（由根開始，以節點本身結尾）。
    pub fn reveal_path(&self, id: ViewNodeId) -> Option<Vec<ViewNodeId>> {
        let node = self.node(id)?;
        Some(node.reveal_path().iter().map(|step| step.id()).collect())
    }

    fn slot(&self, id: ViewNodeId) -> &ViewNode {
        &self.nodes[id.0]
    }
}

/// Borrowed handle to one node of a [`ProjectViewTree`].
/// 指向 [`ProjectViewTree`] 中單一節點的借用把手。
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ProjectViewTree,
    id: ViewNodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> ViewNodeId {
        self.id
    }

    pub fn tree(&self) -> &'a ProjectViewTree {
        self.tree
    }

    fn slot(&self) -> &'a ViewNode {
        self.tree.slot(self.id)
    }

    pub fn item_type(&self) -> ItemType {
        match self.slot().binding {
            NodeBinding::TopLevel { .. } => ItemType::TopLevel,
            NodeBinding::Project { .. } => ItemType::Project,
            NodeBinding::FileGroup { .. } => ItemType::FileGroup,
            NodeBinding::File { .. } => ItemType::File,
        }
    }

    pub fn child_ids(&self) -> &'a [ViewNodeId] {
        match &self.slot().binding {
            NodeBinding::TopLevel { children }
            | NodeBinding::Project { children, .. }
            | NodeBinding::FileGroup { children, .. } => children.as_slice(),
            NodeBinding::File { .. } => &[],
        }
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.child_ids()
            .iter()
            .map(move |id| NodeRef { tree, id: *id })
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.slot().parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// The bound domain entity; the root yields the null placeholder.
    /// 綁定的領域實體；根節點回傳空白佔位實體。
    pub fn model(&self) -> ModelRef<'a> {
        match &self.slot().binding {
            NodeBinding::TopLevel { .. } => ModelRef::Null(&NullModel::INSTANCE),
            NodeBinding::Project { project, .. } => ModelRef::Project(project),
            NodeBinding::FileGroup { group, .. } => ModelRef::FileGroup(group),
            NodeBinding::File { file, .. } => ModelRef::File(file),
        }
    }

    pub fn label(&self) -> &'a str {
        &self.slot().label
    }

    pub fn tooltip(&self) -> Option<&'a str> {
        self.slot().tooltip.as_deref()
    }

    pub fn identity_key(&self) -> &'a str {
        &self.slot().identity_key
    }

    pub fn icon(&self) -> Icon {
        self.slot().icon
    }

    pub fn command(&self) -> Option<&'a OpenFileCommand> {
        match &self.slot().binding {
            NodeBinding::File { command, .. } => Some(command),
            _ => None,
        }
    }

    pub fn collapsible_state(&self) -> CollapsibleState {
        match self.item_type() {
            ItemType::File => CollapsibleState::None,
            _ => CollapsibleState::Collapsed,
        }
    }

    /// Root-first chain of nodes a host expands to reveal this node.
    /// 宿主為顯示此節點需依序展開的節點鏈（由根開始）。
    pub fn reveal_path(&self) -> Vec<NodeRef<'a>> {
        let mut chain = vec![*self];
        let mut current = *self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("item_type", &self.item_type())
            .field("identity_key", &self.identity_key())
            .finish()
    }
}

struct TreeBuilder<'c> {
    config: &'c ExplorerConfig,
    nodes: Vec<ViewNode>,
    file_index: HashMap<String, ViewNodeId>,
    group_keys: HashSet<String>,
}

impl<'c> TreeBuilder<'c> {
    fn new(config: &'c ExplorerConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            file_index: HashMap::new(),
            group_keys: HashSet::new(),
        }
    }

    /// Label of the project node above `id`.
    fn owning_project(&self, id: ViewNodeId) -> &str {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if let NodeBinding::Project { .. } = node.binding {
                return &node.label;
            }
            current = node.parent;
        }
        ""
    }

    fn push(&mut self, node: ViewNode) -> ViewNodeId {
        let id = ViewNodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn attach(&mut self, id: ViewNodeId, built: Vec<ViewNodeId>) {
        match &mut self.nodes[id.0].binding {
            NodeBinding::TopLevel { children }
            | NodeBinding::Project { children, .. }
            | NodeBinding::FileGroup { children, .. } => *children = built,
            NodeBinding::File { .. } => {}
        }
    }

    fn top_level(
        &mut self,
        name: &str,
        projects: &[Arc<Project>],
    ) -> Result<ViewNodeId, ProjectViewError> {
        let id = self.push(ViewNode {
            label: name.to_string(),
            tooltip: None,
            identity_key: name.to_string(),
            icon: Icon::Solution,
            parent: None,
            binding: NodeBinding::TopLevel {
                children: Vec::new(),
            },
        });
        let mut children = Vec::with_capacity(projects.len());
        for (index, project) in projects.iter().enumerate() {
            children.push(self.project(project, index, id)?);
        }
        self.attach(id, children);
        Ok(id)
    }

    fn project(
        &mut self,
        project: &Arc<Project>,
        index: usize,
        parent: ViewNodeId,
    ) -> Result<ViewNodeId, ProjectViewError> {
        if project.name().is_empty() {
            return Err(ProjectViewError::EmptyProjectName { index });
        }
        if project.full_name().is_empty() {
            return Err(ProjectViewError::EmptyProjectFullName {
                project: project.name().to_string(),
            });
        }
        let id = self.push(ViewNode {
            label: project.name().to_string(),
            tooltip: Some(project.full_name().to_string()),
            identity_key: project.full_name().to_string(),
            icon: Icon::Project,
            parent: Some(parent),
            binding: NodeBinding::Project {
                project: Arc::clone(project),
                children: Vec::new(),
            },
        });
        let mut children = Vec::with_capacity(project.groups().len());
        for group in project.groups() {
            children.push(self.file_group(group, project, id)?);
        }
        self.attach(id, children);
        Ok(id)
    }

    fn file_group(
        &mut self,
        group: &Arc<FileGroup>,
        project: &Project,
        parent: ViewNodeId,
    ) -> Result<ViewNodeId, ProjectViewError> {
        if group.name().is_empty() {
            return Err(ProjectViewError::EmptyGroupName {
                project: project.full_name().to_string(),
            });
        }
        // Group names repeat across projects ("Header Files"), so scope them.
        let identity_key = format!(
            "{}{}{}",
            project.full_name(),
            GROUP_KEY_SEPARATOR,
            group.name()
        );
        if !self.group_keys.insert(identity_key.clone()) {
            return Err(ProjectViewError::DuplicateGroup(identity_key));
        }
        let id = self.push(ViewNode {
            label: group.name().to_string(),
            tooltip: None,
            identity_key,
            icon: Icon::Folder,
            parent: Some(parent),
            binding: NodeBinding::FileGroup {
                group: Arc::clone(group),
                children: Vec::new(),
            },
        });
        let mut children = Vec::with_capacity(group.files().len());
        for file in group.files() {
            children.push(self.file(file, group, project, id)?);
        }
        self.attach(id, children);
        Ok(id)
    }

    fn file(
        &mut self,
        file: &Arc<File>,
        group: &FileGroup,
        project: &Project,
        parent: ViewNodeId,
    ) -> Result<ViewNodeId, ProjectViewError> {
        if file.name().is_empty() {
            return Err(ProjectViewError::EmptyFileName {
                group: group.name().to_string(),
            });
        }
        if file.full_name().is_empty() {
            return Err(ProjectViewError::EmptyFileFullName {
                group: group.name().to_string(),
                file: file.name().to_string(),
            });
        }
        if let Some(existing) = self.file_index.get(file.full_name()) {
            return Err(ProjectViewError::DuplicateFile {
                file: file.full_name().to_string(),
                first_project: self.owning_project(*existing).to_string(),
                second_project: project.name().to_string(),
            });
        }
        let identity_key = file.full_name().to_string();
        let command = OpenFileCommand {
            command: self.config.open_command.clone(),
            title: self.config.open_title.clone(),
            identity_key: identity_key.clone(),
            file: Arc::clone(file),
        };
        let id = self.push(ViewNode {
            label: file.name().to_string(),
            tooltip: Some(file.full_name().to_string()),
            identity_key: identity_key.clone(),
            icon: Icon::for_file_name(file.name()),
            parent: Some(parent),
            binding: NodeBinding::File {
                file: Arc::clone(file),
                command,
            },
        });
        trace!(file = %identity_key, node = %id, "registering file node");
        self.file_index.insert(identity_key, id);
        Ok(id)
    }
}

/// Builds trees and publishes them to a [`FileNodeRegistry`].
/// 建立方案樹並發佈至 [`FileNodeRegistry`]。
pub struct TreeFactory<'a> {
    config: &'a ExplorerConfig,
    registry: &'a FileNodeRegistry,
}

impl<'a> TreeFactory<'a> {
    pub fn new(config: &'a ExplorerConfig, registry: &'a FileNodeRegistry) -> Self {
        Self { config, registry }
    }

    /// Builds the full tree and swaps it into the registry. On failure the
    /// registry keeps serving the previous tree.
    /// 建立完整樹並替換註冊表內容；失敗時註冊表保留先前的樹。
    pub fn build(
        &self,
        root_name: &str,
        projects: &[Arc<Project>],
    ) -> Result<Arc<ProjectViewTree>, ProjectViewError> {
        let tree = ProjectViewTree::build(root_name, projects, self.config).map_err(|err| {
            warn!(root = root_name, error = %err, "rejected project view tree");
            err
        })?;
        Ok(self.registry.publish(tree))
    }
}

/// Builds a tree with default settings against the process-wide registry.
/// 以預設設定建立樹並發佈至全域註冊表。
pub fn create_top_level(
    root_name: &str,
    projects: &[Arc<Project>],
) -> Result<Arc<ProjectViewTree>, ProjectViewError> {
    let config = ExplorerConfig::default();
    TreeFactory::new(&config, FileNodeRegistry::global()).build(root_name, projects)
}

/// Reasons a tree cannot be built from the supplied domain model.
/// 無法由領域模型建立樹的原因。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectViewError {
    #[error("project at position {index} has an empty name")]
    EmptyProjectName { index: usize },
    #[error("project '{project}' has an empty full name")]
    EmptyProjectFullName { project: String },
    #[error("project '{project}' contains a group with an empty name")]
    EmptyGroupName { project: String },
    #[error("group '{group}' contains a file with an empty name")]
    EmptyFileName { group: String },
    #[error("file '{file}' in group '{group}' has an empty full name")]
    EmptyFileFullName { group: String, file: String },
    #[error("group key '{0}' is used by more than one file group")]
    DuplicateGroup(String),
    #[error(
        "file '{file}' is listed by project '{first_project}' and again by project '{second_project}'"
    )]
    DuplicateFile {
        file: String,
        first_project: String,
        second_project: String,
    },
}
