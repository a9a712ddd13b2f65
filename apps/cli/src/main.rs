use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand, builder::RangedU64ValueParser};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use bosh_stats_core::{
    BoshStatsError, DEFAULT_PAGE_SIZE, DirectorClient, DirectorSettings, PartialSettings,
    count_deploys, find_release_transition_time, format_counts_json, format_counts_table,
    format_transition, format_transition_json, friendly_month,
};

#[derive(Parser)]
#[command(name = "bosh-stats")]
#[command(about = "Count successful BOSH deploys and find when a release version rolled out")]
#[command(version)]
struct Cli {
    /// BOSH director URL [env: BOSH_ENVIRONMENT]
    #[arg(long, global = true)]
    director_url: Option<String>,

    /// UAA URL [env: BOSH_UAA_URL]
    #[arg(long, global = true)]
    uaa_url: Option<String>,

    /// UAA client id [env: BOSH_CLIENT]
    #[arg(long, global = true)]
    uaa_client_id: Option<String>,

    /// UAA client secret [env: BOSH_CLIENT_SECRET]
    #[arg(long, global = true)]
    uaa_client_secret: Option<String>,

    /// CA certificate, PEM text or path to a PEM file [env: BOSH_CA_CERT]
    #[arg(long, global = true)]
    ca_cert: Option<String>,

    /// JSON config file (defaults to <config dir>/bosh-stats/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Events the director returns per page (the director caps pages at 200)
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=DEFAULT_PAGE_SIZE as u64)
    )]
    page_size: usize,

    /// Log paging progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count successful deploys per deployment in a calendar month
    Count {
        /// Calendar month as YYYY/MM
        #[arg(long)]
        calendar_month: String,

        /// User whose deploys are left out of the counts
        #[arg(long)]
        repave_user: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find when a release was first deployed at a version
    DeployDate {
        /// Release name, e.g. "cf"
        #[arg(long)]
        release: String,

        /// Target release version, compared literally
        #[arg(long)]
        version: String,

        /// Print JSON instead of a sentence
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn settings_flags(&self) -> PartialSettings {
        PartialSettings {
            director_url: self.director_url.clone(),
            uaa_url: self.uaa_url.clone(),
            uaa_client_id: self.uaa_client_id.clone(),
            uaa_client_secret: self.uaa_client_secret.clone(),
            ca_cert: self.ca_cert.clone(),
        }
    }
}

/// `RUST_LOG` when it is set and valid, otherwise `warn` (`debug` with `--verbose`).
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "warn" };
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Table of the counts merged before `err` aborted the walk, if any were.
fn incomplete_counts_table(err: &BoshStatsError, calendar_month: &str) -> Option<String> {
    err.partial_counts()
        .filter(|partial| !partial.is_empty())
        .map(|partial| format_counts_table(partial, calendar_month))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = DirectorSettings::resolve(cli.settings_flags(), cli.config.as_deref()).await?;
    let client = DirectorClient::connect(&settings).await?;

    match cli.command {
        Commands::Count {
            calendar_month,
            repave_user,
            json,
        } => {
            let spinner = create_spinner(&format!(
                "Counting deploys for {}...",
                friendly_month(&calendar_month)
            ));
            let result = count_deploys(
                &client,
                &calendar_month,
                cli.page_size,
                repave_user.as_deref(),
            )
            .await;
            spinner.finish_and_clear();

            match result {
                Ok(counts) if json => println!("{}", format_counts_json(&counts)?),
                Ok(counts) => print!("{}", format_counts_table(&counts, &calendar_month)),
                Err(err) => {
                    if let Some(table) = incomplete_counts_table(&err, &calendar_month) {
                        eprintln!(
                            "{} counts below are incomplete\n{}",
                            style("Warning:").yellow().bold(),
                            table
                        );
                    }
                    return Err(err.into());
                }
            }
        }
        Commands::DeployDate {
            release,
            version,
            json,
        } => {
            let spinner = create_spinner(&format!("Searching for {release}/{version}..."));
            let result =
                find_release_transition_time(&client, &release, &version, cli.page_size).await;
            spinner.finish_and_clear();

            let at = result?;
            if json {
                println!("{}", format_transition_json(&release, &version, at)?);
            } else {
                println!("{}", format_transition(&release, &version, at));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
