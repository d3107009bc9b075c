use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::application::{sign_in, AppError, BankService, Movement};
use crate::domain::{
    format_balance, format_cents, parse_cents, Authenticator, Cents, Credentials, Outcome,
};
use crate::io::{ExportFormat, Exporter};

const PROMPT: &str = "teller> ";

/// Commands accepted once a teller has signed in
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "teller", no_binary_name = true, disable_version_flag = true)]
pub enum TellerCommand {
    /// Open a new account
    Create {
        /// Account number (must be unique)
        id: String,
        /// Account holder name (quote it if it has spaces)
        holder: String,
        /// Opening balance (e.g., "100" or "100.00")
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Deposit money into an account
    Deposit {
        id: String,
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Withdraw money from an account
    Withdraw {
        id: String,
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Show the balance of an account
    Balance { id: String },

    /// Show account details
    Show { id: String },

    /// List all accounts
    List {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },

    /// End the teller session and return to the login prompt
    Logout,

    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Prompts are printed; the terminal echoes input as usual
    Interactive,
    /// No prompts; teller commands are echoed so the transcript reads in order
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Logout,
    Quit,
    Eof,
}

/// A login-then-teller loop over a line-oriented input.
pub struct Session<'a, R, W> {
    service: BankService,
    authenticator: &'a dyn Authenticator,
    lines: Lines<R>,
    out: W,
    mode: SessionMode,
}

impl<'a, R, W> Session<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        service: BankService,
        authenticator: &'a dyn Authenticator,
        input: R,
        out: W,
        mode: SessionMode,
    ) -> Self {
        Self {
            service,
            authenticator,
            lines: input.lines(),
            out,
            mode,
        }
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if !self.login().await? {
                break;
            }
            match self.serve().await? {
                Flow::Logout => continue,
                Flow::Quit | Flow::Eof | Flow::Continue => break,
            }
        }
        self.out.flush().await.context("Failed to flush session output")?;
        Ok(())
    }

    /// Keep asking for credentials. Returns false when input runs out.
    async fn login(&mut self) -> Result<bool> {
        loop {
            self.prompt("Username: ").await?;
            let Some(username) = self.next_input_line().await? else {
                return Ok(false);
            };
            self.prompt("Password: ").await?;
            let Some(password) = self.next_input_line().await? else {
                return Ok(false);
            };

            let credentials = Credentials::new(username.trim(), password);
            match sign_in(self.authenticator, &credentials) {
                Ok(()) => {
                    self.say("Login successful!").await?;
                    return Ok(true);
                }
                Err(AppError::InvalidCredentials) => {
                    self.say("Invalid username or password!").await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn serve(&mut self) -> Result<Flow> {
        loop {
            self.prompt(PROMPT).await?;
            let Some(line) = self.next_input_line().await? else {
                return Ok(Flow::Eof);
            };
            let line = line.trim();
            if self.mode == SessionMode::Script {
                self.say(&format!("{}{}", PROMPT, line)).await?;
            }

            let words = match split_words(line) {
                Ok(words) => words,
                Err(msg) => {
                    self.say(&msg).await?;
                    continue;
                }
            };

            let command = match TellerCommand::try_parse_from(words) {
                Ok(command) => command,
                Err(err) => {
                    let rendered = err.render().to_string();
                    self.say(rendered.trim_end()).await?;
                    continue;
                }
            };

            match self.execute(command).await? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }
        }
    }

    async fn execute(&mut self, command: TellerCommand) -> Result<Flow> {
        match command {
            TellerCommand::Create { id, holder, amount } => {
                let initial = self.amount_or_zero(&amount).await?;
                match self.service.open_account(&id, &holder, initial).await {
                    Ok(_) => self.say("Account created successfully.").await?,
                    Err(AppError::AccountAlreadyExists(_)) => {
                        self.say("Account with this number already exists.").await?
                    }
                    Err(err) => self.say(&err.to_string()).await?,
                }
            }

            TellerCommand::Deposit { id, amount } => {
                let amount = self.amount_or_zero(&amount).await?;
                let result = self.service.deposit(&id, amount).await;
                self.report_movement("Deposited", result).await?;
            }

            TellerCommand::Withdraw { id, amount } => {
                let amount = self.amount_or_zero(&amount).await?;
                let result = self.service.withdraw(&id, amount).await;
                self.report_movement("Withdrew", result).await?;
            }

            TellerCommand::Balance { id } => match self.service.balance(&id).await {
                Ok(balance) => self.say(&format_balance(balance)).await?,
                Err(err) => self.report_error(err).await?,
            },

            TellerCommand::Show { id } => match self.service.account(&id).await {
                Ok(account) => {
                    let details = format!(
                        "Account: {}\n  Holder:  {}\n  Balance: {}\n  Opened:  {}",
                        account.id,
                        account.holder_name,
                        format_cents(account.balance),
                        account.opened_at.format("%Y-%m-%d %H:%M:%S")
                    );
                    self.say(&details).await?;
                }
                Err(err) => self.report_error(err).await?,
            },

            TellerCommand::List { format } => {
                let mut buf = Vec::new();
                Exporter::new(&self.service).export(format, &mut buf).await?;
                self.out
                    .write_all(&buf)
                    .await
                    .context("Failed to write account list")?;
            }

            TellerCommand::Logout => {
                self.say("Logged out.").await?;
                return Ok(Flow::Logout);
            }

            TellerCommand::Quit => {
                self.say("Goodbye.").await?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Unreadable amounts fall back to zero, which the ledger then ignores.
    async fn amount_or_zero(&mut self, text: &str) -> Result<Cents> {
        match parse_cents(text) {
            Ok(cents) => Ok(cents),
            Err(err) => {
                tracing::debug!(input = text, error = %err, "amount rejected, using 0");
                self.say("Invalid amount format!").await?;
                Ok(0)
            }
        }
    }

    async fn report_movement(
        &mut self,
        verb: &str,
        result: Result<Movement, AppError>,
    ) -> Result<()> {
        let movement = match result {
            Ok(movement) => movement,
            Err(err) => return self.report_error(err).await,
        };

        self.say(&format!("{}: {}", verb, format_cents(movement.requested)))
            .await?;
        if let Outcome::Ignored(reason) = movement.outcome {
            self.say(&format!("No change: {}", reason)).await?;
        }
        self.say(&format_balance(movement.balance)).await
    }

    async fn report_error(&mut self, err: AppError) -> Result<()> {
        match err {
            AppError::AccountNotFound(_) => self.say("Account not found.").await,
            other => self.say(&other.to_string()).await,
        }
    }

    /// Next line that is neither blank nor a `#` comment.
    async fn next_input_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .context("Failed to read session input")?;
            match line {
                Some(line) if line.trim().is_empty() || line.trim_start().starts_with('#') => {
                    continue
                }
                other => return Ok(other),
            }
        }
    }

    async fn prompt(&mut self, text: &str) -> Result<()> {
        if self.mode == SessionMode::Interactive {
            self.out.write_all(text.as_bytes()).await?;
            self.out.flush().await?;
        }
        Ok(())
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        Ok(())
    }
}

/// Split a command line on whitespace, keeping quoted runs together.
pub fn split_words(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unterminated quote: {}", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
