//! RaidBot CLI - run and maintain the RaidBot site.
//!
//! # Commands
//!
//! - `raidbot serve` - Serve the site
//! - `raidbot unused-keys [roots...]` - Report translation keys no source references
//! - `raidbot resolve` - Show which locale a request would get

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod error;

use commands::{resolve, serve, unused_keys};
use error::CliResult;

/// RaidBot site tools
#[derive(Parser)]
#[command(name = "raidbot")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Serve the RaidBot site and maintain its translations")]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} raidbot serve --port 8080\n  {} raidbot unused-keys -o json src\n  {} raidbot resolve --accept-language \"ko-KR,ko;q=0.9\"",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site
    #[command(alias = "s", visible_alias = "start")]
    Serve(ServeArgs),

    /// Find translation keys that no source file references
    #[command(alias = "u")]
    UnusedKeys(UnusedKeysArgs),

    /// Show which locale a request would be served in
    #[command(alias = "r")]
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Configuration file (JSON, TOML or .env)
    #[arg(short, long, env = "RAIDBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to run the server on
    #[arg(short, long)]
    port: Option<u16>,

    /// Secure cookies and https sitemap URLs
    #[arg(long)]
    production: bool,
}

#[derive(Args)]
struct UnusedKeysArgs {
    /// Source directories to scan
    #[arg(default_value = "src")]
    roots: Vec<PathBuf>,

    /// Show all unused keys
    #[arg(short, long)]
    verbose: bool,

    /// Only report this top-level namespace
    #[arg(short, long)]
    namespace: Option<String>,

    /// Output format: console, json or csv
    #[arg(short, long, default_value = "console")]
    output: String,

    /// Only report namespaces with usage at or below this percentage
    #[arg(short, long, default_value_t = 0)]
    threshold: u32,

    /// Log every scanned file
    #[arg(short, long)]
    debug: bool,

    /// Read translations from this directory instead of the built-in catalog
    #[arg(long)]
    locales: Option<PathBuf>,

    /// File extensions to scan (repeatable)
    #[arg(long = "ext")]
    extensions: Vec<String>,
}

#[derive(Args)]
struct ResolveArgs {
    /// Value of the `lang` query parameter
    #[arg(short, long)]
    lang: Option<String>,

    /// Stored `i18n` cookie value
    #[arg(short, long)]
    cookie: Option<String>,

    /// Accept-Language header
    #[arg(short, long)]
    accept_language: Option<String>,

    /// Print the decision as JSON
    #[arg(long)]
    json: bool,

    /// Render the cookie as production would
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    raidbot_log::init();

    let result: CliResult<()> = match cli.command {
        Commands::Serve(args) => {
            let overrides = serve::ServeOverrides {
                host: args.host,
                port: args.port,
                production: args.production,
            };
            serve::execute(args.config.as_deref(), overrides).await
        }

        Commands::UnusedKeys(args) => unused_keys::execute(unused_keys::AuditOptions {
            roots: args.roots,
            extensions: args.extensions,
            locales_dir: args.locales,
            namespace: args.namespace,
            output: args.output,
            threshold: args.threshold,
            verbose: args.verbose,
            debug: args.debug,
        }),

        Commands::Resolve(args) => resolve::execute(
            resolve::ResolveInput {
                lang: args.lang,
                cookie: args.cookie,
                accept_language: args.accept_language,
            },
            args.json,
            args.production,
        ),
    };

    if let Err(e) = result {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
