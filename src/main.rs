use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use raystat::{
    aggregate::aggregate_by_author,
    cache::Cache,
    config::Config,
    output::{
        print_author_detail, print_author_table, print_categories, print_extension_detail,
        print_extension_table, print_json, print_stale_notice, print_updates, OutputFormat,
    },
    service::{Listings, StoreService},
    view::{self, AuthorSort, ExtensionSort, UpdateWindow},
};
use serde::Serialize;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "raystat")]
#[command(
    author,
    version,
    about = "Download statistics and growth trends for the Raycast extension store"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank store extensions by installs or growth
    Extensions {
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = ExtensionSort::Downloads)]
        sort: ExtensionSort,

        /// Only list extensions tagged with this category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum table rows, 0 for all
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Refetch from the store even when the cache is fresh
        #[arg(long)]
        refresh: bool,

        /// Write JSON results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Abbreviate install counts (12.3K)
        #[arg(long)]
        compact: bool,
    },

    /// Rank authors by the installs across their extensions
    Authors {
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = AuthorSort::Downloads)]
        sort: AuthorSort,

        /// Maximum table rows, 0 for all
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Refetch from the store even when the cache is fresh
        #[arg(long)]
        refresh: bool,

        /// Write JSON results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Abbreviate install counts (12.3K)
        #[arg(long)]
        compact: bool,
    },

    /// List extensions created or updated recently
    Updates {
        /// How far back to look
        #[arg(short, long, value_enum, default_value_t = UpdateWindow::Today)]
        window: UpdateWindow,

        /// Maximum table rows per section, 0 for all
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Refetch from the store even when the cache is fresh
        #[arg(long)]
        refresh: bool,

        /// Write JSON results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Abbreviate install counts (12.3K)
        #[arg(long)]
        compact: bool,
    },

    /// Show one extension in detail
    Show {
        /// Extension name or display title
        name: String,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Refetch from the store even when the cache is fresh
        #[arg(long)]
        refresh: bool,

        /// Write JSON results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Abbreviate install counts (12.3K)
        #[arg(long)]
        compact: bool,
    },

    /// Show one author in detail
    Author {
        /// Author handle
        handle: String,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Refetch from the store even when the cache is fresh
        #[arg(long)]
        refresh: bool,

        /// Write JSON results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Abbreviate install counts (12.3K)
        #[arg(long)]
        compact: bool,
    },

    /// List store categories with listing counts
    Categories {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Refetch from the store even when the cache is fresh
        #[arg(long)]
        refresh: bool,

        /// Write JSON results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Abbreviate install counts (12.3K)
        #[arg(long)]
        compact: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Clear the cache
    ClearCache,
}

/// Flags shared by every data command, resolved against the config file.
struct CommonOptions {
    format: OutputFormat,
    refresh: bool,
    output: Option<String>,
    compact: bool,
}

impl CommonOptions {
    fn resolve(
        config: &Config,
        format: Option<String>,
        refresh: bool,
        output: Option<String>,
        compact: bool,
    ) -> Result<Self> {
        let format_str = format.unwrap_or_else(|| config.default_format.clone());
        let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
        Ok(Self {
            format,
            refresh,
            output,
            compact: compact || config.compact_numbers,
        })
    }

    fn interactive(&self) -> bool {
        self.format == OutputFormat::Table && self.output.is_none()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raystat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    match cli.command {
        Commands::Extensions {
            sort,
            category,
            limit,
            format,
            refresh,
            output,
            compact,
        } => {
            let opts = CommonOptions::resolve(&config, format, refresh, output, compact)?;
            let limit = limit.unwrap_or(config.default_limit);
            run_extensions(&store_service(&config), sort, category, limit, opts).await
        }
        Commands::Authors {
            sort,
            limit,
            format,
            refresh,
            output,
            compact,
        } => {
            let opts = CommonOptions::resolve(&config, format, refresh, output, compact)?;
            let limit = limit.unwrap_or(config.default_limit);
            run_authors(&store_service(&config), sort, limit, opts).await
        }
        Commands::Updates {
            window,
            limit,
            format,
            refresh,
            output,
            compact,
        } => {
            let opts = CommonOptions::resolve(&config, format, refresh, output, compact)?;
            let limit = limit.unwrap_or(config.default_limit);
            run_updates(&store_service(&config), window, limit, opts).await
        }
        Commands::Show {
            name,
            format,
            refresh,
            output,
            compact,
        } => {
            let opts = CommonOptions::resolve(&config, format, refresh, output, compact)?;
            run_show(&store_service(&config), &name, opts).await
        }
        Commands::Author {
            handle,
            format,
            refresh,
            output,
            compact,
        } => {
            let opts = CommonOptions::resolve(&config, format, refresh, output, compact)?;
            run_author(&store_service(&config), &handle, opts).await
        }
        Commands::Categories {
            format,
            refresh,
            output,
            compact,
        } => {
            let opts = CommonOptions::resolve(&config, format, refresh, output, compact)?;
            run_categories(&store_service(&config), opts).await
        }
        Commands::Config { init, path } => handle_config(init, path),
        Commands::ClearCache => {
            let cache = Cache::new();
            cache.clear()?;
            println!("Cache cleared.");
            Ok(())
        }
    }
}

fn store_service(config: &Config) -> StoreService {
    StoreService::new(Cache::with_ttl_hours(config.cache_ttl_hours))
}

async fn run_extensions(
    service: &StoreService,
    sort: ExtensionSort,
    category: Option<String>,
    limit: usize,
    opts: CommonOptions,
) -> Result<()> {
    let listings = load_listings(service, &opts).await?;

    let mut extensions = listings.extensions;
    if let Some(category) = &category {
        if !view::all_categories(&extensions).contains(category) {
            anyhow::bail!(
                "Unknown category: {}. Run 'raystat categories' to list them.",
                category
            );
        }
        extensions = view::filter_category(&extensions, category);
    }
    view::sort_extensions(&mut extensions, sort);

    if let Some(path) = &opts.output {
        write_output(path, &extensions)?;
    } else {
        match opts.format {
            OutputFormat::Table => print_extension_table(&extensions, limit, opts.compact)?,
            OutputFormat::Json => print_json(&extensions)?,
        }
    }

    Ok(())
}

async fn run_authors(
    service: &StoreService,
    sort: AuthorSort,
    limit: usize,
    opts: CommonOptions,
) -> Result<()> {
    let listings = load_listings(service, &opts).await?;

    let mut authors = aggregate_by_author(&listings.extensions);
    view::sort_authors(&mut authors, sort);

    if let Some(path) = &opts.output {
        write_output(path, &authors)?;
    } else {
        match opts.format {
            OutputFormat::Table => print_author_table(&authors, limit, opts.compact)?,
            OutputFormat::Json => print_json(&authors)?,
        }
    }

    Ok(())
}

async fn run_updates(
    service: &StoreService,
    window: UpdateWindow,
    limit: usize,
    opts: CommonOptions,
) -> Result<()> {
    let listings = load_listings(service, &opts).await?;

    let report = view::updates(&listings.extensions, window, Local::now());

    if let Some(path) = &opts.output {
        write_output(path, &report)?;
    } else {
        match opts.format {
            OutputFormat::Table => print_updates(&report, limit, opts.compact)?,
            OutputFormat::Json => print_json(&report)?,
        }
    }

    Ok(())
}

async fn run_show(service: &StoreService, name: &str, opts: CommonOptions) -> Result<()> {
    let listings = load_listings(service, &opts).await?;

    let extension = view::find_extension(&listings.extensions, name)
        .ok_or_else(|| anyhow::anyhow!("No extension named '{}' in the store listings", name))?;

    if let Some(path) = &opts.output {
        write_output(path, extension)?;
    } else {
        match opts.format {
            OutputFormat::Table => print_extension_detail(extension, opts.compact)?,
            OutputFormat::Json => print_json(extension)?,
        }
    }

    Ok(())
}

async fn run_author(service: &StoreService, handle: &str, opts: CommonOptions) -> Result<()> {
    let listings = load_listings(service, &opts).await?;

    let authors = aggregate_by_author(&listings.extensions);
    let stats = view::find_author(&authors, handle)
        .ok_or_else(|| anyhow::anyhow!("No author with handle '{}'", handle))?;

    if let Some(path) = &opts.output {
        write_output(path, stats)?;
    } else {
        match opts.format {
            OutputFormat::Table => print_author_detail(stats, opts.compact)?,
            OutputFormat::Json => print_json(stats)?,
        }
    }

    Ok(())
}

async fn run_categories(service: &StoreService, opts: CommonOptions) -> Result<()> {
    let listings = load_listings(service, &opts).await?;

    let counts = view::category_counts(&listings.extensions);

    if let Some(path) = &opts.output {
        write_output(path, &counts)?;
    } else {
        match opts.format {
            OutputFormat::Table => print_categories(&counts)?,
            OutputFormat::Json => print_json(&counts)?,
        }
    }

    Ok(())
}

/// Loads the enriched listing set, with a spinner on interactive runs.
async fn load_listings(service: &StoreService, opts: &CommonOptions) -> Result<Listings> {
    let progress = if opts.interactive() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching store listings...");
        Some(pb)
    } else {
        None
    };

    let result = if opts.refresh {
        service.revalidate().await
    } else {
        service.extensions().await
    };

    if let Some(pb) = progress {
        match &result {
            Ok(listings) => pb.finish_with_message(format!(
                "Loaded {} extensions",
                listings.extensions.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    if opts.interactive() {
        if let Ok(listings) = &result {
            if listings.stale {
                print_stale_notice(listings.fetched_at);
            }
        }
    }

    result
}

fn write_output<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    println!("Results written to: {}", path);
    Ok(())
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'raystat config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_commands_accept_common_flags() {
        let bases: [&[&str]; 6] = [
            &["extensions"],
            &["authors"],
            &["updates"],
            &["categories"],
            &["show", "pomodoro"],
            &["author", "janedoe"],
        ];
        for base in bases {
            let mut args = vec!["raystat"];
            args.extend_from_slice(base);
            args.extend_from_slice(&["--format", "json", "--refresh", "--compact"]);
            assert!(Cli::try_parse_from(args.iter().copied()).is_ok(), "{:?}", args);
        }
    }

    #[test]
    fn test_categories_accepts_compact() {
        let cli = Cli::try_parse_from(["raystat", "categories", "--compact"]).unwrap();
        match cli.command {
            Commands::Categories { compact, .. } => assert!(compact),
            _ => panic!("parsed into the wrong subcommand"),
        }
    }
}
