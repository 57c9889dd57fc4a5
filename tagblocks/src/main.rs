//! tagblocks - inspect and exercise tag-targeted content blocks
//!
//! This tool provides commands for:
//! - Checking tracking and reporting configuration
//! - Listing the blocks a set of page tags would display
//! - Running a tracked click against the configured endpoints
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/tagblocks/config.toml (~/.config/tagblocks/config.toml)
//! - Logs: $XDG_STATE_HOME/tagblocks/tagblocks.log (~/.local/state/tagblocks/tagblocks.log)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tagblocks_core::{
    ClickOutcome, Config, ContextTags, CustomBlocks, Navigator, PageContext, ReqwestTransport,
};

#[derive(Parser)]
#[command(name = "tagblocks")]
#[command(about = "Tag-targeted content blocks with click tracking")]
#[command(version)]
struct Args {
    /// Verbose output (writes a log file)
    #[arg(short, long)]
    verbose: bool,

    /// Config file (default: $XDG_CONFIG_HOME/tagblocks/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show configuration and readiness
    Status,

    /// List the blocks displayed for a set of page tags
    Select {
        /// Page tags, comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Print blocks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Track a click on a selected block
    Click {
        /// Page tags, comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Which of the selected blocks to click
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        /// URL of the page the block is shown on
        #[arg(long)]
        page_url: String,

        /// Document referrer
        #[arg(long, default_value = "")]
        referrer: String,

        /// Link href that was clicked
        #[arg(long)]
        href: Option<String>,
    },
}

/// Navigator that prints transitions instead of routing
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn transition_to(&self, path: &str) {
        println!("Navigate to:     {}", path);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };

    let _log_guard = if args.verbose {
        let guard = tagblocks_core::logging::init(&config.logging)
            .context("failed to initialize logging")?;
        Some(guard)
    } else {
        None
    };

    match args.command {
        Command::Status => cmd_status(&config),
        Command::Select { tags, json } => cmd_select(&config, tags, json),
        Command::Click {
            tags,
            index,
            page_url,
            referrer,
            href,
        } => cmd_click(&config, tags, index, &page_url, referrer, href),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn cmd_status(config: &Config) -> Result<()> {
    println!("tagblocks Configuration");
    println!("=======================");
    println!();

    let definitions = config.blocks.definitions.definitions();
    println!("Blocks:          {}", definitions.len());
    println!();

    println!("Tracking");
    println!("  Endpoint:      {}", config.tracking.endpoint().unwrap_or("(not set)"));
    println!("  Ready:         {}", yes_no(config.tracking.is_ready()));
    println!();

    let reporting = &config.reporting;
    println!("Error reports");
    println!("  API key:       {}", yes_no(reporting.api_key().is_some()));
    println!("  Category ID:   {}", reporting.category_id().unwrap_or("(not set)"));
    println!(
        "  Post to:       {}",
        reporting.report_url().unwrap_or("(page origin)")
    );
    println!("  Ready:         {}", yes_no(reporting.is_ready()));
    println!();

    println!("Config file:     {}", Config::config_path().display());
    println!("Log file:        {}", tagblocks_core::logging::log_file_path().display());

    Ok(())
}

fn cmd_select(config: &Config, tags: Vec<String>, json: bool) -> Result<()> {
    let context: ContextTags = tags.into_iter().collect();
    let blocks =
        tagblocks_core::selector::select_from_setting(&config.blocks.definitions, &context);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&blocks).context("failed to serialize blocks")?
        );
        return Ok(());
    }

    if blocks.is_empty() {
        println!("No blocks match these tags.");
        return Ok(());
    }

    for (i, block) in blocks.iter().enumerate() {
        println!(
            "[{}] placement={} campaign={}",
            i,
            block.placement_id.as_deref().unwrap_or("-"),
            block.campaign_id.as_deref().unwrap_or("-")
        );
        println!("    {}", block.content);
    }

    Ok(())
}

fn cmd_click(
    config: &Config,
    tags: Vec<String>,
    index: usize,
    page_url: &str,
    referrer: String,
    href: Option<String>,
) -> Result<()> {
    let page = PageContext::new(page_url, referrer).context("invalid --page-url")?;
    let transport = ReqwestTransport::new().context("failed to create HTTP client")?;
    let blocks = CustomBlocks::new(config, page, Arc::new(transport), Arc::new(PrintNavigator));

    let context: ContextTags = tags.into_iter().collect();
    let shown = blocks.blocks_to_display(&context);
    let Some(block) = shown.get(index) else {
        bail!(
            "no block at index {} ({} blocks match these tags)",
            index,
            shown.len()
        );
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    let outcome = runtime.block_on(blocks.handle_block_click(block, href.as_deref()));

    match outcome {
        ClickOutcome::NotConfigured => {
            println!("Tracking endpoint is not configured; nothing sent.")
        }
        ClickOutcome::Succeeded { navigated_to: None } => println!("Tracked."),
        ClickOutcome::Succeeded { .. } => println!("Tracked and navigated."),
        ClickOutcome::Failed { message } => println!("Tracking failed: {}", message),
    }

    Ok(())
}
