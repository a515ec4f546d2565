use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use vultr_catalog::catalog::{apply_filters, categories, fetch_records, CatalogSnapshot, RecordFilter};
use vultr_catalog::config::{mask_secret, Config};
use vultr_catalog::docs::DocsUpdater;
use vultr_catalog::export::{export_snapshot, OutputFormat};
use vultr_catalog::vultr::client::VultrClient;
use vultr_catalog::CatalogError;

/// Retrieve Vultr catalog data and keep the reference docs current
#[derive(Parser, Debug)]
#[command(name = "vultr-catalog", version, about, long_about = None)]
struct Args {
    /// Log level for diagnostics (RUST_LOG overrides it)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve plans, regions and operating systems and save them
    Fetch(FetchArgs),
    /// Rebuild PLAN_IDS.md, REGION_CODES.md and OS_IDS.md from the latest CSVs
    UpdateDocs(UpdateDocsArgs),
    /// Show or change persisted defaults
    Config(ConfigArgs),
}

#[derive(ClapArgs, Debug)]
struct FetchArgs {
    /// Vultr API key (optional, not required for public endpoints)
    #[arg(long)]
    api_key: Option<String>,

    /// Directory to save output files (default: current directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "both")]
    format: OutputFormat,

    /// Keep only records whose FIELD equals one of the values, e.g. country=US,GB
    #[arg(long = "filter", value_name = "FIELD=VALUE[,VALUE]")]
    filters: Vec<String>,

    /// API root URL
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct UpdateDocsArgs {
    /// Directory containing CSV files (default: ./scripts)
    #[arg(long)]
    scripts_dir: Option<PathBuf>,

    /// Directory containing markdown files (default: current directory)
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Keep CSV files after generating documentation
    #[arg(long)]
    keep_csv: bool,
}

#[derive(ClapArgs, Debug)]
struct ConfigArgs {
    /// Print the effective configuration
    #[arg(long)]
    show: bool,

    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    scripts_dir: Option<PathBuf>,

    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Width limit of extra Markdown table cells
    #[arg(long)]
    max_cell_width: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.to_string().to_lowercase()));

    let (writer, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::debug!("vultr-catalog started with log level: {:?}", level);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level, args.log_file.as_ref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let config = Config::load();

    let result = match args.command {
        Command::Fetch(fetch) => run_fetch(&config, fetch).await,
        Command::UpdateDocs(update) => run_update_docs(&config, update),
        Command::Config(settings) => run_config(config, settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(CatalogError::NotFound { .. }) = err.downcast_ref::<CatalogError>() {
                eprintln!("Error: {err}");
            } else {
                eprintln!("Unexpected error: {err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_fetch(config: &Config, args: FetchArgs) -> Result<()> {
    let filters = args
        .filters
        .iter()
        .map(|f| RecordFilter::parse(f))
        .collect::<Result<Vec<_>, _>>()?;

    let api_key = config.effective_api_key(args.api_key.as_deref());
    let base_url = config.effective_base_url(args.base_url.as_deref());
    let output_dir = config.effective_output_dir(args.output_dir.as_deref());

    let client = VultrClient::with_base_url(&base_url, api_key.as_deref())?;
    tracing::info!(
        "Using {} ({})",
        client.base_url(),
        if client.has_api_key() { "authenticated" } else { "anonymous" }
    );

    let mut snapshot = CatalogSnapshot::new(chrono::Local::now().naive_local());
    for category in categories() {
        println!("Fetching Vultr {}...", category.display_name);
        let records = apply_filters(fetch_records(&client, category).await, &filters);
        println!("Retrieved {} {}", records.len(), category.display_name);
        snapshot.push(category, records);
    }

    let summary = export_snapshot(&snapshot, &output_dir, args.format);

    println!("\n=== Summary ===");
    for (category, records) in &snapshot.results {
        println!("{}: {}", capitalize(&category.display_name), records.len());
    }
    if summary.failed.is_empty() {
        println!("\nAll data saved to {}/", output_dir.display());
    } else {
        println!(
            "\n{} of {} files could not be written",
            summary.failed.len(),
            summary.failed.len() + summary.written.len()
        );
    }

    Ok(())
}

fn run_update_docs(config: &Config, args: UpdateDocsArgs) -> Result<()> {
    let updater = DocsUpdater::new(
        config.effective_scripts_dir(args.scripts_dir.as_deref()),
        config.effective_docs_dir(args.docs_dir.as_deref()),
    )
    .with_max_cell_width(config.max_cell_width);

    println!("{}", "=".repeat(60));
    println!("Vultr Documentation Updater");
    println!("{}", "=".repeat(60));
    println!();

    let summary = updater.run(args.keep_csv)?;

    println!("All documentation files updated successfully!");
    println!();
    println!("Updated files:");
    for path in &summary.updated {
        println!("  - {}", path.display());
    }
    println!();

    if summary.kept {
        println!("Keeping CSV files as requested");
    } else {
        println!("Cleaning up CSV files...");
        for path in &summary.deleted {
            println!("  Deleted: {}", path.display());
        }
    }

    Ok(())
}

fn run_config(mut config: Config, args: ConfigArgs) -> Result<()> {
    let mut changed = false;
    if let Some(url) = args.base_url {
        VultrClient::with_base_url(&url, None)?;
        config.base_url = Some(url);
        changed = true;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = Some(dir);
        changed = true;
    }
    if let Some(dir) = args.scripts_dir {
        config.scripts_dir = Some(dir);
        changed = true;
    }
    if let Some(dir) = args.docs_dir {
        config.docs_dir = Some(dir);
        changed = true;
    }
    if let Some(width) = args.max_cell_width {
        config.max_cell_width = Some(width);
        changed = true;
    }

    if changed {
        config.save()?;
        if let Some(path) = Config::config_path() {
            println!("Saved {}", path.display());
        }
    }

    if args.show || !changed {
        println!("base_url:       {}", config.effective_base_url(None));
        println!("output_dir:     {}", config.effective_output_dir(None).display());
        println!("scripts_dir:    {}", config.effective_scripts_dir(None).display());
        println!("docs_dir:       {}", config.effective_docs_dir(None).display());
        match config.max_cell_width {
            Some(width) => println!("max_cell_width: {}", width),
            None => println!("max_cell_width: per category"),
        }
        match config.effective_api_key(None) {
            Some(key) => println!("api_key:        {} (from environment)", mask_secret(&key)),
            None => println!("api_key:        not set"),
        }
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
