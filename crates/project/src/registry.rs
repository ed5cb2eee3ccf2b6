use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::tree::{NodeRef, ProjectViewTree, ViewNodeId};

static GLOBAL_REGISTRY: Lazy<FileNodeRegistry> = Lazy::new(FileNodeRegistry::new);

/// Owned reference to a file node in a published tree.
/// 指向已發佈樹中檔案節點的擁有型參照。
#[derive(Debug, Clone)]
pub struct FileNodeHandle {
    tree: Arc<ProjectViewTree>,
    id: ViewNodeId,
}

impl FileNodeHandle {
    pub fn id(&self) -> ViewNodeId {
        self.id
    }

    pub fn tree(&self) -> &Arc<ProjectViewTree> {
        &self.tree
    }

    pub fn generation(&self) -> u64 {
        self.tree.generation()
    }

    pub fn node(&self) -> NodeRef<'_> {
        // Handles are only minted from the tree's own file index.
        self.tree.node_ref(self.id)
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    generation: u64,
    current: Option<Arc<ProjectViewTree>>,
}

/// Maps fully-qualified file names to the file node currently showing them.
///
/// Publishing a tree replaces every entry at once, so lookups never observe a
/// half-built tree or entries left over from an earlier one.
///
/// 以完整檔名對應至目前顯示該檔案的節點；發佈新樹時一次替換所有條目。
#[derive(Debug, Default)]
pub struct FileNodeRegistry {
    state: RwLock<RegistryState>,
}

impl FileNodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, empty until the first tree is published.
    /// 全域註冊表，首次發佈前為空。
    pub fn global() -> &'static FileNodeRegistry {
        &GLOBAL_REGISTRY
    }

    /// Stamps `tree` with the next generation and makes it the current tree.
    pub fn publish(&self, mut tree: ProjectViewTree) -> Arc<ProjectViewTree> {
        let mut state = self.state.write();
        state.generation += 1;
        tree.set_generation(state.generation);
        let tree = Arc::new(tree);
        let replaced = state.current.replace(Arc::clone(&tree));
        debug!(
            generation = state.generation,
            files = tree.file_count(),
            replaced = replaced.map(|old| old.file_count()).unwrap_or(0),
            "published project view tree"
        );
        tree
    }

    /// Returns the node registered for `full_name`, or `None` when no file
    /// with that name is part of the current tree.
    pub fn lookup(&self, full_name: &str) -> Option<FileNodeHandle> {
        let state = self.state.read();
        let tree = state.current.as_ref()?;
        let id = tree.find_file(full_name)?.id();
        Some(FileNodeHandle {
            tree: Arc::clone(tree),
            id,
        })
    }

    pub fn current_tree(&self) -> Option<Arc<ProjectViewTree>> {
        self.state.read().current.clone()
    }

    /// Generation of the most recent publish; 0 before any.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .current
            .as_ref()
            .map(|tree| tree.file_count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the current tree. The generation counter keeps running.
    pub fn clear(&self) {
        self.state.write().current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerConfig;
    use solution_explorer_model::{File, FileGroup, Project};

    fn project(name: &str, files: &[&str]) -> Arc<Project> {
        let files = files
            .iter()
            .map(|path| Arc::new(File::from_path(*path)))
            .collect();
        Arc::new(Project::new(
            name,
            name,
            vec![Arc::new(FileGroup::new("Sources", files))],
        ))
    }

    fn tree(projects: &[Arc<Project>]) -> ProjectViewTree {
        ProjectViewTree::build("Solution", projects, &ExplorerConfig::default()).unwrap()
    }

    #[test]
    fn empty_registry_misses() {
        let registry = FileNodeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.generation(), 0);
        assert!(registry.lookup("App/main.c").is_none());
        assert!(registry.current_tree().is_none());
    }

    #[test]
    fn lookup_resolves_published_file_nodes() {
        let registry = FileNodeRegistry::new();
        let published = registry.publish(tree(&[project("App", &["App/main.c", "App/io.h"])]));

        assert_eq!(published.generation(), 1);
        assert_eq!(registry.len(), 2);
        let handle = registry.lookup("App/io.h").unwrap();
        assert!(Arc::ptr_eq(handle.tree(), &published));
        assert_eq!(handle.node().label(), "io.h");
        assert_eq!(handle.generation(), 1);
        assert!(registry.lookup("App/missing.c").is_none());
    }

    #[test]
    fn republishing_evicts_stale_entries() {
        let registry = FileNodeRegistry::new();
        registry.publish(tree(&[project("App", &["App/old.c", "App/kept.c"])]));
        let second = registry.publish(tree(&[project("App", &["App/kept.c"])]));

        assert!(registry.lookup("App/old.c").is_none());
        let kept = registry.lookup("App/kept.c").unwrap();
        assert!(Arc::ptr_eq(kept.tree(), &second));
        assert_eq!(kept.generation(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_drops_entries_but_keeps_counting() {
        let registry = FileNodeRegistry::new();
        registry.publish(tree(&[project("App", &["App/main.c"])]));
        registry.clear();
        assert!(registry.lookup("App/main.c").is_none());
        assert_eq!(registry.generation(), 1);

        let next = registry.publish(tree(&[]));
        assert_eq!(next.generation(), 2);
    }
}
