use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

use crate::application::BankService;
use crate::domain::{format_cents, Account};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Point-in-time view of every account, as written by the JSON export
#[derive(Debug, Clone, Serialize)]
pub struct AccountsSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
}

/// Renders the accounts held by a service. Nothing is ever read back.
pub struct Exporter<'a> {
    service: &'a BankService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BankService) -> Self {
        Self { service }
    }

    /// Write all accounts in the given format and return how many were written.
    pub async fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Table => self.export_table(writer).await,
            ExportFormat::Json => self.export_json(writer).await,
            ExportFormat::Csv => self.export_csv(writer).await,
        }
    }

    pub async fn export_table<W: Write>(&self, mut writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await;
        if accounts.is_empty() {
            writeln!(writer, "No accounts found.")?;
            return Ok(0);
        }

        writeln!(
            writer,
            "{:<12} {:<24} {:>14}  {}",
            "ACCOUNT", "HOLDER", "BALANCE", "OPENED"
        )?;
        writeln!(writer, "{}", "-".repeat(72))?;
        for account in &accounts {
            writeln!(
                writer,
                "{:<12} {:<24} {:>14}  {}",
                account.id,
                truncate(&account.holder_name, 24),
                format_cents(account.balance),
                account.opened_at.format("%Y-%m-%d %H:%M:%S")
            )?;
        }
        writer.flush()?;
        Ok(accounts.len())
    }

    pub async fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "holder_name", "balance", "opened_at"])?;
        for account in &accounts {
            csv_writer.write_record([
                account.id.as_str(),
                account.holder_name.as_str(),
                format_cents(account.balance).as_str(),
                account.opened_at.to_rfc3339().as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let snapshot = AccountsSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: self.service.list_accounts().await,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(snapshot.accounts.len())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
