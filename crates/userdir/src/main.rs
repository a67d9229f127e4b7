use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use fastrace::collector::Config as FastraceConfig;
use fastrace::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use userdir_config::{get_config_path, Config};
use userdir_output::*;
use userdir_source::HttpDirectorySource;
use userdir_types::{is_known_nationality, Gender, NATIONALITIES};
use userdir_view::{DirectoryView, ViewPhase};

mod browse;
mod profiling;

use crate::profiling::CollectingReporter;

const MAIN_HELP: &str = r#"userdir fetches a small set of user profiles from a remote directory
service and lets you narrow them down by name, age bracket, nationality and
gender.

`userdir list` fetches once, applies the filters given as flags and prints
the result. `userdir browse` keeps the fetched list in memory and re-filters
it as you type commands like `search jane`, `age 21-40` or `nat US`.

The directory is fetched exactly once per run. Filtering happens locally."#;

#[derive(Parser)]
#[command(name = "userdir")]
#[command(about = MAIN_HELP)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(long, global = true, help = "Print timing information for profiling")]
    profile: bool,

    #[arg(long, global = true, help = "Config file to use instead of the default")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch the directory and print the users matching the filters.")]
    List {
        #[arg(short = 's', long, help = "Case-insensitive substring of \"first last\"")]
        search: Option<String>,
        #[arg(short = 'a', long, help = "Age range: 0-20, 21-40, 41-60, 61+ or MIN-MAX")]
        age: Option<String>,
        #[arg(short = 'n', long, help = "Nationality code, e.g. US")]
        nat: Option<String>,
        #[arg(short = 'g', long, help = "male or female")]
        gender: Option<Gender>,
    },

    #[command(about = "Fetch the directory and filter it interactively.")]
    Browse,

    #[command(about = "List the nationality codes that can be filtered on.")]
    Nationalities,

    #[command(about = "Print config file location and contents.")]
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let config = Config::load_from(&config_path)?;
    init_logging(&config);

    if !cli.profile {
        return run(cli.command, &config, &config_path, cli.json).await;
    }

    let (reporter, collector) = CollectingReporter::new();
    fastrace::set_reporter(reporter, FastraceConfig::default());

    let root = Span::root("userdir", SpanContext::random());
    let result = run(cli.command, &config, &config_path, cli.json)
        .in_span(root)
        .await;

    fastrace::flush();
    let stats = collector.collect_function_stats();
    if !stats.is_empty() {
        eprintln!("\nTIMING\n{}", format_function_stats(&stats).join("\n"));
    }

    result
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(
    command: Commands,
    config: &Config,
    config_path: &std::path::Path,
    json_output: bool,
) -> Result<()> {
    match command {
        Commands::List {
            search,
            age,
            nat,
            gender,
        } => handle_list(config, json_output, search, age, nat, gender).await,
        Commands::Browse => browse::run_browse(activate_view(config)?, json_output).await,
        Commands::Nationalities => handle_nationalities(json_output),
        Commands::Config => handle_config(config_path),
    }
}

fn activate_view(config: &Config) -> Result<DirectoryView> {
    let source = HttpDirectorySource::new(&config.source)?;
    tracing::debug!("Activating view against {}", source.endpoint());
    Ok(DirectoryView::activate(Arc::new(source)))
}

async fn handle_list(
    config: &Config,
    json_output: bool,
    search: Option<String>,
    age: Option<String>,
    nat: Option<String>,
    gender: Option<Gender>,
) -> Result<()> {
    let view = activate_view(config)?;

    if let Some(query) = search {
        view.set_search_query(query);
    }
    if let Some(age) = &age {
        if !view.set_age_range_str(age) {
            eprintln!(
                "Warning: '{}' is not an age range, showing all ages. Use one of: {}",
                age,
                format_age_brackets()
            );
        }
    }
    if let Some(code) = nat.as_deref().filter(|c| !is_known_nationality(c)) {
        eprintln!("Warning: '{}' is not in the nationality list, see `userdir nationalities`", code);
    }
    view.set_nationality(nat);
    view.set_gender(gender);

    view.wait_settled().await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&view_to_json(&view))?);
    }

    match view.phase() {
        ViewPhase::Errored(err) => Err(anyhow!("{}: {}", ERROR_MESSAGE, err)),
        _ => {
            if !json_output {
                println!("{}", format_view(&view));
            }
            Ok(())
        }
    }
}

fn handle_nationalities(json_output: bool) -> Result<()> {
    if json_output {
        let entries: Vec<_> = NATIONALITIES
            .iter()
            .map(|(code, name)| json!({"code": code, "name": name}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", format_nationalities());
    }
    Ok(())
}

fn handle_config(config_path: &std::path::Path) -> Result<()> {
    println!("Config file: {}", config_path.display());
    println!();

    if config_path.exists() {
        println!("{}", std::fs::read_to_string(config_path)?);
    } else {
        println!("(file does not exist, using defaults)");
    }
    Ok(())
}
