mod display;
mod server;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use olympcheck_core::endpoint::DEFAULT_BASE_URL;
use olympcheck_core::{Endpoints, PersonQuery};
use olympcheck_eligibility::{Matcher, load_tables};
use olympcheck_fetch::{CheckerConfig, DEFAULT_YEARS_BACK, DiplomaChecker, HttpTransport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "olympcheck",
    version,
    about = "Check olympiad diplomas on diploma.rsr-olymp.ru and the admission benefits they grant"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up one person and print their diplomas.
    Check {
        #[command(flatten)]
        settings: Settings,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        middlename: String,
        /// Birth date, YYYY-MM-DD.
        #[arg(long)]
        birthdate: NaiveDate,
        /// Print JSON instead of cards.
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API (`GET /health`, `POST /check`).
    Serve {
        #[command(flatten)]
        settings: Settings,
        #[arg(long, env = "OLYMPCHECK_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
}

#[derive(Args)]
struct Settings {
    /// JSON file with the per-institution olympiad tables.
    #[arg(long, env = "OLYMPCHECK_TABLES")]
    tables: PathBuf,
    /// Storage root of the diploma registry.
    #[arg(long, env = "OLYMPCHECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Number of years to probe, counting the current one.
    #[arg(
        long,
        env = "OLYMPCHECK_YEARS_BACK",
        default_value_t = DEFAULT_YEARS_BACK,
        value_parser = clap::value_parser!(u32).range(1..=30)
    )]
    years_back: u32,
    /// Per-request timeout in seconds.
    #[arg(long, env = "OLYMPCHECK_TIMEOUT_SECS", default_value_t = 5)]
    timeout_secs: u64,
}

impl Settings {
    /// Load the eligibility tables and build a checker. Missing or empty
    /// tables are fatal: the service must not answer without them.
    fn build_checker(&self) -> anyhow::Result<DiplomaChecker<HttpTransport>> {
        let tables = load_tables(&self.tables)
            .with_context(|| format!("loading eligibility tables from {}", self.tables.display()))?;
        let matcher = Matcher::new(tables).context("initializing eligibility tables")?;

        let summary = matcher.summary();
        let names: Vec<&str> = matcher.institutions().collect();
        info!(
            institutions = %names.join(", "),
            pairs = summary.total_pairs,
            "eligibility tables ready"
        );
        if summary.empty_tables > 0 {
            warn!(count = summary.empty_tables, "some institution tables are empty");
        }

        let transport = HttpTransport::new().context("building HTTP client")?;
        let config = CheckerConfig {
            years_back: self.years_back,
            timeout: Duration::from_secs(self.timeout_secs),
        };
        Ok(DiplomaChecker::new(
            transport,
            Endpoints::new(&self.base_url),
            Arc::new(matcher),
            config,
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("olympcheck v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Check {
            settings,
            lastname,
            firstname,
            middlename,
            birthdate,
            json,
        } => {
            let checker = settings.build_checker()?;
            let person = PersonQuery {
                lastname,
                firstname,
                middlename,
                birthdate,
            };
            let diplomas = checker.check(&person).await;
            if diplomas.is_empty() {
                anyhow::bail!("No diplomas found");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&diplomas)?);
            } else {
                for diploma in &diplomas {
                    print!("{}", display::render_card(diploma));
                }
            }
        }
        Command::Serve { settings, bind } => {
            let checker = settings.build_checker()?;
            server::serve(Arc::new(checker), bind).await?;
        }
    }
    Ok(())
}
