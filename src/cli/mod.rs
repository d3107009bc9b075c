mod session;

pub use session::*;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use crate::application::BankService;
use crate::domain::StaticAuthenticator;
use crate::observability::{self, LogFormat};

/// Tellerdesk - a teller's terminal over an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "tellerdesk")]
#[command(about = "Open accounts, deposit, withdraw and check balances from a teller session")]
#[command(version)]
pub struct Cli {
    /// Username the login prompt accepts
    #[arg(long, env = "TELLERDESK_USERNAME", default_value = StaticAuthenticator::DEFAULT_USERNAME)]
    pub username: String,

    /// Password the login prompt accepts
    #[arg(
        long,
        env = "TELLERDESK_PASSWORD",
        default_value = StaticAuthenticator::DEFAULT_PASSWORD,
        hide_env_values = true
    )]
    pub password: String,

    /// Read the session from a file instead of the terminal
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        observability::init(self.verbose, self.log_format);

        let authenticator = StaticAuthenticator::new(&self.username, &self.password);
        let service = BankService::new();
        let stdout = tokio::io::stdout();

        match &self.script {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                tracing::info!(script = %path.display(), "running scripted session");
                Session::new(
                    service,
                    &authenticator,
                    BufReader::new(file),
                    stdout,
                    SessionMode::Script,
                )
                .run()
                .await
            }
            None => {
                Session::new(
                    service,
                    &authenticator,
                    BufReader::new(tokio::io::stdin()),
                    stdout,
                    SessionMode::Interactive,
                )
                .run()
                .await
            }
        }
    }
}
