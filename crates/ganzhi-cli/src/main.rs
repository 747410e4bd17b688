#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use ganzhi_core::ErrorCode;
use ganzhi_core::config::resolve_config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "gz",
    author,
    version,
    about = "gz: sexagenary cycle (六十甲子) reference",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Dataset file (JSON). Overrides GANZHI_DATA and project config.
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "List the sixty ganzhi",
        long_about = "List the sixty ganzhi in cycle order with their base attributes.",
        after_help = "EXAMPLES:\n    # All sixty\n    gz list\n\n    # Names containing 甲\n    gz list --search 甲\n\n    # Emit machine-readable output\n    gz list --format json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one ganzhi",
        long_about = "Show nayin, symbolism, auspicious entities, preferences and relations of one ganzhi.",
        after_help = "EXAMPLES:\n    # Show a ganzhi\n    gz show 甲子\n\n    # Emit machine-readable output\n    gz show 甲子 --format json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Compare several ganzhi",
        long_about = "Compare ganzhi side by side, one column per name in the order given.",
        after_help = "EXAMPLES:\n    # Compare two\n    gz compare 甲子 乙丑\n\n    # Emit machine-readable output\n    gz compare 甲子 乙丑 丙寅 --format json"
    )]
    Compare(cmd::compare::CompareArgs),

    #[command(
        next_help_heading = "Relations",
        about = "Relation graph",
        long_about = "Build the relation graph, optionally restricted to one relation type.",
        after_help = "EXAMPLES:\n    # Every relation\n    gz graph\n\n    # Only clashes, with statistics\n    gz graph --type 六冲 --stats\n\n    # Feed a renderer\n    gz graph --type six_harm --format json"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        next_help_heading = "Relations",
        about = "Relation types in the catalog",
        after_help = "EXAMPLES:\n    gz types"
    )]
    Types,

    #[command(
        next_help_heading = "Browse",
        about = "Browse by nayin",
        long_about = "Group ganzhi by nayin, or filter by nayin name, life-cycle status or magnitude.",
        after_help = "EXAMPLES:\n    # Nayin groups\n    gz nayin\n\n    # Ganzhi in the 帝旺 stage\n    gz nayin --status 帝旺\n\n    # Stages present\n    gz nayin --statuses"
    )]
    Nayin(cmd::nayin::NayinArgs),

    #[command(
        next_help_heading = "Browse",
        about = "Browse auspicious entities (神煞)",
        after_help = "EXAMPLES:\n    # Every entity name\n    gz shensha\n\n    # Ganzhi carrying 天乙贵人\n    gz shensha 天乙贵人"
    )]
    Shensha(cmd::shensha::ShenshaArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    gz completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GANZHI_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "ganzhi=debug,info"
        } else {
            "ganzhi=info,warn"
        })
    });

    let format = env::var("GANZHI_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let cwd = env::current_dir()?;
    let project_root = cmd::find_project_root(&cwd);
    debug!(root = %project_root.display(), "project root");

    let fallback_mode = cli.format.unwrap_or(if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    });
    let config = match resolve_config(&project_root, cli.json, cli.data.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                fallback_mode,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };

    let ctx = cmd::Context {
        output: resolve_output_mode(cli.format, &config.resolved_output),
        config,
    };
    if cli.verbose {
        info!(output = ?ctx.output, data = ?ctx.config.resolved_data, "verbose mode enabled");
    }

    match &cli.command {
        Commands::List(args) => cmd::list::run_list(args, &ctx),
        Commands::Show(args) => cmd::show::run_show(args, &ctx),
        Commands::Compare(args) => cmd::compare::run_compare(args, &ctx),
        Commands::Graph(args) => cmd::graph::run_graph(args, &ctx),
        Commands::Types => cmd::types::run_types(&ctx),
        Commands::Nayin(args) => cmd::nayin::run_nayin(args, &ctx),
        Commands::Shensha(args) => cmd::shensha::run_shensha(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}
