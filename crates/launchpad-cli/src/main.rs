//! Launchpad - game client launcher
//!
//! Usage:
//!   launchpad scan              # List installable clients
//!   launchpad installed         # List installed clients
//!   launchpad install <name>    # Install a scanned client
//!   launchpad launch <name>     # Launch an installed client
//!   launchpad search <query>    # Search the mod registry
//!   launchpad mod <id>          # Show one mod registry project

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launchpad_core::config::{ConfigStore, LauncherConfig};
use launchpad_core::context::AppContext;
use launchpad_core::orchestration::{
    InstallOutcome, LaunchOutcome, ProjectOutcome, RefreshOutcome, SearchOutcome, SearchRequest,
};
use launchpad_core::types::{ClientRecord, ModProject, SearchHit};
use launchpad_core::view::{ClientCard, SearchView, Tab, TabView, project, search_view};

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Game client launcher", long_about = None)]
struct Cli {
    /// Path to launchpad.toml (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Local client service URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    service_url: Option<String>,

    /// Mod registry URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    registry_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the local client service is reachable
    Health,

    /// Scan for installable clients
    Scan {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List installed clients
    #[command(alias = "ls")]
    Installed {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Install a client found by scan
    Install {
        /// Client name as reported by scan
        name: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Launch an installed client
    Launch {
        /// Installed client name
        name: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Search the mod registry
    Search {
        /// Search text
        query: String,
        /// Restrict to a category (e.g. shader, optimization)
        #[arg(long)]
        category: Option<String>,
        /// Restrict to a game version (e.g. 1.20.1)
        #[arg(long)]
        game_version: Option<String>,
        /// Maximum number of hits
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        limit: Option<u8>,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show details of a mod registry project
    Mod {
        /// Project id or slug, as listed by search
        id: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// No output; exit status only
    Quiet,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "launchpad=info,launchpad_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if matches!(cli.command, Commands::Config) {
        println!("{}", launchpad_core::config::to_toml(&config)?);
        return Ok(());
    }

    let ctx = AppContext::from_config(config)?;
    run_cli(&ctx, cli.command).await
}

fn load_config(cli: &Cli) -> Result<LauncherConfig> {
    let store = match &cli.config {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::from_default_location()?,
    };
    let mut config = store.load_with_env()?;

    if let Some(url) = &cli.service_url {
        config.service.url = url.clone();
    }
    if let Some(url) = &cli.registry_url {
        config.registry.url = Some(url.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn run_cli(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Health => run_health(ctx).await,
        Commands::Scan { format } => run_scan(ctx, format).await,
        Commands::Installed { format } => run_installed(ctx, format).await,
        Commands::Install { name, format } => run_install(ctx, &name, format).await,
        Commands::Launch { name, format } => run_launch(ctx, &name, format).await,
        Commands::Search {
            query,
            category,
            game_version,
            limit,
            format,
        } => {
            let mut request = SearchRequest::new(query);
            if let Some(category) = category {
                request = request.with_category(category);
            }
            if let Some(version) = game_version {
                request = request.with_game_version(version);
            }
            if let Some(limit) = limit {
                request = request.with_limit(limit);
            }
            run_search(ctx, request, format).await
        }
        Commands::Mod { id, format } => run_mod(ctx, &id, format).await,
        Commands::Config => Ok(()),
    }
}

async fn run_health(ctx: &AppContext) -> Result<()> {
    if ctx.discovery().health().await {
        println!("{} Local client service is healthy", style("✓").green());
        Ok(())
    } else {
        anyhow::bail!(
            "Local client service at {} is not healthy",
            ctx.config().service.url
        )
    }
}

async fn run_scan(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    if let RefreshOutcome::Failed { reason } = ctx.discovery().scan().await {
        anyhow::bail!("Scan failed: {}", reason);
    }
    let snapshot = ctx.registry().snapshot();
    let TabView::Clients { cards, .. } = project(Tab::Clients, &snapshot) else {
        return Ok(());
    };
    print_clients(&cards, format, "No clients found. Drop client jars into the clients directory.")
}

async fn run_installed(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    if let RefreshOutcome::Failed { reason } = ctx.discovery().refresh_installed().await {
        anyhow::bail!("Could not list installed clients: {}", reason);
    }
    let snapshot = ctx.registry().snapshot();
    let TabView::Installed { cards } = project(Tab::Installed, &snapshot) else {
        return Ok(());
    };
    print_clients(&cards, format, "No clients installed yet.")
}

async fn run_install(ctx: &AppContext, name: &str, format: OutputFormat) -> Result<()> {
    if let RefreshOutcome::Failed { reason } = ctx.discovery().scan().await {
        anyhow::bail!("Scan failed: {}", reason);
    }
    let client = find_client(&ctx.registry().available_clients(), name)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No scanned client named '{}'. Run `launchpad scan` to list clients",
                name
            )
        })?;

    let outcome = ctx.installer().install(&client).await;

    match format {
        OutputFormat::Table => match &outcome {
            InstallOutcome::Installed { message } => {
                println!("{} {}", style("✓").green(), message);
            }
            InstallOutcome::AlreadyInstalling => {
                println!("• '{}' is already being installed", name);
            }
            InstallOutcome::Failed { .. } => {}
        },
        OutputFormat::Json => {
            let output = match &outcome {
                InstallOutcome::Installed { message } => {
                    serde_json::json!({"name": name, "status": "success", "message": message})
                }
                InstallOutcome::AlreadyInstalling => {
                    serde_json::json!({"name": name, "status": "installing"})
                }
                InstallOutcome::Failed { reason } => {
                    serde_json::json!({"name": name, "status": "error", "error": reason})
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }

    if let InstallOutcome::Failed { reason } = outcome {
        anyhow::bail!("Installing '{}' failed: {}", name, reason);
    }
    Ok(())
}

async fn run_launch(ctx: &AppContext, name: &str, format: OutputFormat) -> Result<()> {
    if let RefreshOutcome::Failed { reason } = ctx.discovery().refresh_installed().await {
        anyhow::bail!("Could not list installed clients: {}", reason);
    }
    let client = find_client(&ctx.registry().installed_clients(), name)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "'{}' is not installed. Run `launchpad installed` to list installed clients",
                name
            )
        })?;

    match ctx.launcher().launch(&client).await {
        LaunchOutcome::Launched(handle) => {
            match format {
                OutputFormat::Table => println!(
                    "{} Launched '{}' (PID {})",
                    style("✓").green(),
                    client.name,
                    style(handle.pid).bold()
                ),
                OutputFormat::Json => {
                    let output = serde_json::json!({"name": client.name, "pid": handle.pid});
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Quiet => {}
            }
            Ok(())
        }
        LaunchOutcome::Failed { reason } => {
            anyhow::bail!("Launching '{}' failed: {}", name, reason)
        }
    }
}

async fn run_search(ctx: &AppContext, request: SearchRequest, format: OutputFormat) -> Result<()> {
    if let SearchOutcome::EmptyQuery = ctx.search().search_with(request).await {
        anyhow::bail!("Search query must not be empty");
    }

    let snapshot = ctx.registry().snapshot();
    match (search_view(&snapshot.search), format) {
        (SearchView::Failed { reason }, _) => anyhow::bail!("Search failed: {}", reason),
        (_, OutputFormat::Quiet) => {}
        (view, OutputFormat::Json) => {
            let hits: &[SearchHit] = match view {
                SearchView::Results(hits) => hits,
                _ => &[],
            };
            println!("{}", serde_json::to_string_pretty(hits)?);
        }
        (SearchView::Results(hits), OutputFormat::Table) => print_hits(hits),
        (_, OutputFormat::Table) => println!("No results found."),
    }
    Ok(())
}

async fn run_mod(ctx: &AppContext, id: &str, format: OutputFormat) -> Result<()> {
    let details = match ctx.search().project(id).await {
        ProjectOutcome::Found(details) => details,
        ProjectOutcome::EmptyId => anyhow::bail!("Project id must not be empty"),
        ProjectOutcome::Failed { reason } => {
            anyhow::bail!("Could not fetch project '{}': {}", id, reason)
        }
    };

    match format {
        OutputFormat::Table => print_project(&details),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn find_client(clients: &[ClientRecord], name: &str) -> Option<ClientRecord> {
    clients
        .iter()
        .find(|c| c.name == name)
        .or_else(|| clients.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
        .cloned()
}

fn print_clients(cards: &[ClientCard<'_>], format: OutputFormat, empty: &str) -> Result<()> {
    match format {
        OutputFormat::Table => print_client_table(cards, empty),
        OutputFormat::Json => {
            let clients: Vec<&ClientRecord> = cards.iter().map(|card| card.client).collect();
            println!("{}", serde_json::to_string_pretty(&clients)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn print_client_table(cards: &[ClientCard<'_>], empty: &str) {
    if cards.is_empty() {
        println!("{}", empty);
        return;
    }

    println!(
        "{:<24} {:<10} {:<10} {:>10}  Path",
        "Name", "Type", "Version", "Size"
    );
    println!("{}", "-".repeat(80));

    for card in cards {
        let client = card.client;
        println!(
            "{:<24} {:<10} {:<10} {:>10}  {}",
            client.name,
            client.kind,
            client.version,
            card.size_label(),
            client.path
        );
        if let Some(warning) = &client.warning {
            println!("  {} {}", style("⚠").yellow(), warning);
        }
        if let Some(installed) = card.installed_label() {
            println!("  {}", style(format!("installed {installed}")).dim());
        }
    }
}

fn print_hits(hits: &[SearchHit]) {
    println!("{:<32} {:>12}  {:<10}  Description", "Title", "Downloads", "Updated");
    println!("{}", "-".repeat(80));

    for hit in hits {
        let updated = hit
            .date_modified
            .as_ref()
            .map(|ts| ts.date_label())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:>12}  {:<10}  {}",
            truncate(&hit.title, 32),
            hit.downloads,
            updated,
            truncate(&hit.description, 60)
        );
    }
}

fn print_project(details: &ModProject) {
    println!("{} ({})", style(&details.title).bold(), details.slug);
    if !details.description.is_empty() {
        println!("{}", details.description);
    }
    println!();
    let kind = details.project_type.as_deref().unwrap_or("-");
    let updated = details
        .updated
        .as_ref()
        .map(|ts| ts.date_label())
        .unwrap_or_else(|| "-".to_string());
    println!("{:<14} {}", "Id:", details.id);
    println!("{:<14} {}", "Type:", kind);
    println!("{:<14} {}", "Downloads:", details.downloads);
    println!("{:<14} {}", "Followers:", details.followers);
    println!("{:<14} {}", "Updated:", updated);
    println!("{:<14} {}", "Categories:", list_or_dash(&details.categories));
    println!("{:<14} {}", "Loaders:", list_or_dash(&details.loaders));
    println!("{:<14} {}", "Game versions:", list_or_dash(&details.game_versions));
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
