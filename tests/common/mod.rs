// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tellerdesk::application::BankService;
use tellerdesk::cli::{Session, SessionMode};
use tellerdesk::domain::StaticAuthenticator;

/// Helper to create a service holding the two standard accounts:
/// 1001 Alice with 100.00 and 2002 Bob with 25.50
pub async fn service_with_accounts() -> Result<BankService> {
    let service = BankService::new();
    service.open_account("1001", "Alice", 10000).await?;
    service.open_account("2002", "Bob", 2550).await?;
    Ok(service)
}

/// Run a scripted session with the default credentials and return its transcript
pub async fn run_script(service: BankService, script: &str) -> Result<String> {
    let authenticator = StaticAuthenticator::default();
    let mut out = Vec::new();
    Session::new(
        service,
        &authenticator,
        script.as_bytes(),
        &mut out,
        SessionMode::Script,
    )
    .run()
    .await?;
    Ok(String::from_utf8(out)?)
}

/// Prefix a teller script with a successful login
pub fn signed_in(commands: &str) -> String {
    format!("user\npass\n{}", commands)
}
