use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use solution_explorer_model::{SnapshotStore, SolutionSnapshot};
use solution_explorer_project::{
    ExplorerConfig, FileNodeRegistry, NodeRef, ProjectViewTree, TreeFactory,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SOLUTION_EXPLORER_LOG";

#[derive(Parser)]
#[command(
    name = "solution-explorer",
    about = "Render and query solution explorer trees",
    author,
    version
)]
struct Cli {
    /// 方案總管設定檔（JSON）。 / Explorer configuration file (JSON).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 輸出整棵方案樹。 / Print the whole solution tree.
    Tree(TreeArgs),
    /// 找出檔案節點並列出展開路徑。 / Locate a file node and print the path that reveals it.
    Reveal(RevealArgs),
}

#[derive(Args)]
struct SnapshotArgs {
    /// 方案快照 JSON 檔。 / Solution snapshot JSON file.
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// 覆寫根節點名稱；預設使用快照名稱。 / Root node name; defaults to the snapshot name.
    #[arg(long, value_name = "NAME")]
    root_name: Option<String>,
}

#[derive(Args)]
struct TreeArgs {
    #[command(flatten)]
    source: SnapshotArgs,

    /// 輸出格式。 / Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args)]
struct RevealArgs {
    #[command(flatten)]
    source: SnapshotArgs,

    /// 檔案的完整名稱。 / Fully-qualified file name to look up.
    #[arg(value_name = "FILE")]
    file: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let Cli { config, command } = Cli::parse();
    let config = load_config(config.as_deref())?;
    match command {
        Commands::Tree(args) => execute_tree(args, &config),
        Commands::Reveal(args) => execute_reveal(args, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ExplorerConfig> {
    match path {
        Some(path) => {
            let path = resolve_input_path(path)?;
            ExplorerConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(ExplorerConfig::default()),
    }
}

fn execute_tree(args: TreeArgs, config: &ExplorerConfig) -> Result<()> {
    let tree = build_tree(&args.source, config)?;
    match args.format {
        OutputFormat::Text => print_outline(tree.root(), 0),
        OutputFormat::Json => {
            let payload = serde_json::to_string_pretty(&tree.tree_items(config))
                .context("failed to serialize tree")?;
            println!("{payload}");
        }
    }
    Ok(())
}

fn execute_reveal(args: RevealArgs, config: &ExplorerConfig) -> Result<()> {
    build_tree(&args.source, config)?;
    let handle = FileNodeRegistry::global()
        .lookup(&args.file)
        .ok_or_else(|| anyhow!("no node registered for {}", args.file))?;
    let node = handle.node();
    println!("{}", reveal_chain(node));
    if let Some(command) = node.command() {
        println!("{} ({})", command.title, command.command);
    }
    Ok(())
}

fn print_outline(node: NodeRef<'_>, depth: usize) {
    println!(
        "{}{} [{}]",
        "  ".repeat(depth),
        node.label(),
        node.icon().asset_name()
    );
    for child in node.children() {
        print_outline(child, depth + 1);
    }
}

fn reveal_chain(node: NodeRef<'_>) -> String {
    node.reveal_path()
        .iter()
        .map(|step| step.label())
        .collect::<Vec<_>>()
        .join(" > ")
}

fn build_tree(source: &SnapshotArgs, config: &ExplorerConfig) -> Result<Arc<ProjectViewTree>> {
    let snapshot = load_snapshot(&source.snapshot)?;
    let root_name = source.root_name.as_deref().unwrap_or(&snapshot.name);
    TreeFactory::new(config, FileNodeRegistry::global())
        .build(root_name, &snapshot.projects)
        .with_context(|| format!("failed to build tree from {}", source.snapshot.display()))
}

fn load_snapshot(path: &Path) -> Result<SolutionSnapshot> {
    let path = resolve_input_path(path)?;
    match SnapshotStore::new(&path).load() {
        Ok(Some(snapshot)) => {
            debug!(
                snapshot = %path.display(),
                projects = snapshot.projects.len(),
                "loaded solution snapshot"
            );
            Ok(snapshot)
        }
        Ok(None) => bail!("snapshot {} does not exist", path.display()),
        Err(err) => Err(err).with_context(|| format!("failed to load {}", path.display())),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
