mod demo;
mod sender;
mod terminal_output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use inline_menu::MenuMiddleware;
use inline_menu_config::{apply_all_defaults, config_dir, config_file_path, load_and_prepare, write_config, MenuConfig};

use demo::{build_demo_menu, DemoContext};
use sender::{OutputFormat, StdoutSender};
use terminal_output::{describe_dispatch, supports_color};

#[derive(Parser)]
#[command(name = "inline-menu")]
#[command(about = "Inline keyboard menus, driven from the terminal")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.inline-menu/menu.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print menus as Bot API JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Menu(MenuCommand),
    /// Write a config file with all defaults filled in
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Commands that load the config and drive the demo menu.
#[derive(Subcommand)]
enum MenuCommand {
    /// Print the responder tree of the demo menu
    Tree,
    /// Press buttons in order, printing every menu that gets sent
    Press {
        /// Callback data of each press, e.g. /settings/lang:de
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Send a menu as a reply to a text command
    Reply {
        /// Menu path to send; the root menu when omitted
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Init { force } => init(&config_path, force).await,
        Commands::Menu(command) => run(command, &config_path, cli.json).await,
    }
}

async fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite it", config_path.display());
    }
    write_config(&apply_all_defaults(MenuConfig::default()), config_path).await?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

async fn run(command: MenuCommand, config_path: &Path, json: bool) -> Result<()> {
    let config = load_and_prepare(config_path).await?;
    inline_menu_logging::init_from_config(&config);
    info!(config = %config_path.display(), root = %config.root_path(), "[Menu] Starting");

    let color = !json && supports_color();
    let format = if json { OutputFormat::Json } else { OutputFormat::Text { color } };
    let menu = build_demo_menu(&config)?;
    let middleware = MenuMiddleware::from_config(&config, menu, Arc::new(StdoutSender::new(format)))?;

    let ctx = DemoContext::default();
    match command {
        MenuCommand::Tree => println!("{}", middleware.tree()),
        MenuCommand::Press { paths } => {
            for path in paths {
                let outcome = middleware.middleware(&ctx.press(&path)).await?;
                eprintln!("{}", describe_dispatch(&outcome, color));
            }
        }
        MenuCommand::Reply { path } => {
            let sent = middleware.reply_to_context(&ctx.command(), path.as_deref()).await?;
            info!(path = %sent, "[Menu] Replied");
        }
    }

    Ok(())
}
