use std::sync::Arc;

use solution_explorer_model::{File, FileGroup, Project};
use solution_explorer_project::{
    create_top_level, ExplorerConfig, FileNodeRegistry, Icon, ItemType, NodeRef,
    ProjectViewError, TreeFactory,
};

fn app_project() -> Arc<Project> {
    let sources = FileGroup::new(
        "Sources",
        vec![
            Arc::new(File::from_path("App/Sources/main.cpp")),
            Arc::new(File::from_path("App/Sources/util.h")),
        ],
    );
    Arc::new(Project::new("App", "App", vec![Arc::new(sources)]))
}

fn outline(node: NodeRef<'_>) -> Vec<(ItemType, String, String)> {
    node.tree()
        .walk()
        .into_iter()
        .map(|node| {
            (
                node.item_type(),
                node.label().to_string(),
                node.identity_key().to_string(),
            )
        })
        .collect()
}

#[test]
fn builds_solution_down_to_files_and_registers_them() {
    let registry = FileNodeRegistry::new();
    let config = ExplorerConfig::default();
    let projects = vec![app_project()];
    let tree = TreeFactory::new(&config, &registry)
        .build("Solution", &projects)
        .unwrap();

    let root = tree.root();
    assert_eq!(root.item_type(), ItemType::TopLevel);
    let app = root.children().next().unwrap();
    assert_eq!(app.item_type(), ItemType::Project);
    assert_eq!(app.label(), "App");

    let sources = app.children().next().unwrap();
    assert_eq!(sources.item_type(), ItemType::FileGroup);
    assert_eq!(sources.label(), "Sources");
    let group = sources.model().as_file_group().unwrap();
    assert!(std::ptr::eq(group, &*projects[0].groups()[0]));

    let files: Vec<(&str, Icon)> = sources
        .children()
        .map(|node| (node.label(), node.icon()))
        .collect();
    assert_eq!(files, vec![("main.cpp", Icon::Cpp), ("util.h", Icon::H)]);

    let handle = registry.lookup("App/Sources/util.h").unwrap();
    assert!(Arc::ptr_eq(handle.tree(), &tree));
    assert_eq!(handle.node(), sources.children().nth(1).unwrap());
    for file in sources.children() {
        let found = registry.lookup(file.identity_key()).unwrap();
        assert_eq!(found.node(), file);
    }
}

#[test]
fn rebuilding_the_same_snapshot_gives_equal_but_distinct_trees() {
    let registry = FileNodeRegistry::new();
    let config = ExplorerConfig::default();
    let factory = TreeFactory::new(&config, &registry);
    let projects = vec![app_project()];

    let first = factory.build("Solution", &projects).unwrap();
    let second = factory.build("Solution", &projects).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(outline(first.root()), outline(second.root()));
    assert_eq!(second.generation(), first.generation() + 1);

    let handle = registry.lookup("App/Sources/main.cpp").unwrap();
    assert!(Arc::ptr_eq(handle.tree(), &second));
}

#[test]
fn failed_build_leaves_previous_tree_published() {
    let registry = FileNodeRegistry::new();
    let config = ExplorerConfig::default();
    let factory = TreeFactory::new(&config, &registry);
    let good = factory.build("Solution", &[app_project()]).unwrap();

    let broken = vec![app_project(), app_project()];
    let err = factory.build("Solution", &broken).unwrap_err();
    assert_eq!(
        err,
        ProjectViewError::DuplicateFile {
            file: "App/Sources/main.cpp".to_string(),
            first_project: "App".to_string(),
            second_project: "App".to_string(),
        }
    );

    assert_eq!(registry.generation(), good.generation());
    let handle = registry.lookup("App/Sources/util.h").unwrap();
    assert!(Arc::ptr_eq(handle.tree(), &good));
}

#[test]
fn create_top_level_publishes_to_the_global_registry() {
    let tree = create_top_level("Global", &[app_project()]).unwrap();
    let handle = FileNodeRegistry::global()
        .lookup("App/Sources/main.cpp")
        .unwrap();
    assert!(Arc::ptr_eq(handle.tree(), &tree));
    let chain: Vec<&str> = handle
        .node()
        .reveal_path()
        .iter()
        .map(|node| node.label())
        .collect();
    assert_eq!(chain, vec!["Global", "App", "Sources", "main.cpp"]);
}

#[test]
fn unnamed_group_is_rejected_without_publishing() {
    let registry = FileNodeRegistry::new();
    let config = ExplorerConfig::default();
    let factory = TreeFactory::new(&config, &registry);
    let good = factory.build("Solution", &[app_project()]).unwrap();

    let unnamed = Arc::new(Project::new(
        "Tools",
        "Tools",
        vec![Arc::new(FileGroup::new("", Vec::new()))],
    ));
    let err = factory.build("Solution", &[unnamed]).unwrap_err();
    assert_eq!(
        err,
        ProjectViewError::EmptyGroupName {
            project: "Tools".to_string(),
        }
    );

    assert_eq!(registry.generation(), good.generation());
    assert!(Arc::ptr_eq(&registry.current_tree().unwrap(), &good));
    assert!(registry.lookup("App/Sources/main.cpp").is_some());
}
