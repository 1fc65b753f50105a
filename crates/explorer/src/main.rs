use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use notes_explorer::config::{ExplorerConfig, CONFIG_FILE_NAME};
use notes_explorer::render::{self, RenderOptions};
use notes_explorer::Explorer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notes-explorer", version)]
#[command(about = "Browse a notes vault as a hierarchical backlink tree", long_about = None)]
struct Cli {
    /// Vault root directory
    #[arg(long, env = "EXPLORER_VAULT", default_value = ".", global = true)]
    vault: PathBuf,

    /// Config file (defaults to explorer.toml in the vault root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only group link targets under this folder
    #[arg(long, global = true)]
    base_path: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the whole tree with aggregate counts
    Tree {
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Show one node and the documents linking to it directly
    Find { path: String },
    /// List the node's path and every path below it
    Paths { path: String },
    /// List every document linking to the node or below it
    Docs { path: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.vault.join(CONFIG_FILE_NAME));
    let mut config = ExplorerConfig::load(&config_path)?;
    if let Some(base_path) = cli.base_path {
        config.base_path = base_path;
    }

    let explorer = Explorer::open(&cli.vault, config)
        .with_context(|| format!("Failed to open vault {}", cli.vault.display()))?;
    let tree = explorer.tree();
    let options = RenderOptions {
        color: !cli.no_color,
        max_depth: None,
    };

    match cli.command {
        Command::Tree { depth } => {
            if cli.json {
                println!("{}", render::tree_json(tree, depth)?);
            } else {
                let options = RenderOptions {
                    max_depth: depth,
                    ..options
                };
                print!("{}", render::render_tree(tree, options));
            }
        }
        Command::Find { path } => {
            let node = explorer
                .find(&path)
                .ok_or_else(|| anyhow!("No node at path: {path}"))?;
            if cli.json {
                println!("{}", render::node_json(tree, node, None)?);
            } else {
                print!("{}", render::render_node(tree, node, options));
            }
        }
        Command::Paths { path } => {
            if explorer.find(&path).is_none() {
                anyhow::bail!("No node at path: {path}");
            }
            let mut paths: Vec<String> = explorer.filter_paths(&path).into_iter().collect();
            paths.sort();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else {
                print!("{}", render::render_list(&paths));
            }
        }
        Command::Docs { path } => {
            if explorer.find(&path).is_none() {
                anyhow::bail!("No node at path: {path}");
            }
            let documents = explorer.documents_under(&path);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                print!("{}", render::render_list(&documents));
            }
        }
    }

    Ok(())
}
