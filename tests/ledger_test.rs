mod common;

use anyhow::Result;
use common::service_with_accounts;
use tellerdesk::application::{AppError, BankService};
use tellerdesk::domain::{IgnoreReason, Ledger, Outcome};

#[tokio::test]
async fn test_open_account_then_balance() -> Result<()> {
    let service = BankService::new();
    let account = service.open_account("1001", "Alice", 10000).await?;

    assert_eq!(account.id, "1001");
    assert_eq!(account.holder_name, "Alice");
    assert_eq!(service.balance("1001").await?, 10000);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_account_keeps_original() -> Result<()> {
    let service = service_with_accounts().await?;

    let result = service.open_account("1001", "Mallory", 500000).await;
    assert!(matches!(result, Err(AppError::AccountAlreadyExists(id)) if id == "1001"));

    let account = service.account("1001").await?;
    assert_eq!(account.holder_name, "Alice");
    assert_eq!(account.balance, 10000);
    Ok(())
}

#[tokio::test]
async fn test_deposit_and_withdraw_example() -> Result<()> {
    let service = service_with_accounts().await?;

    let movement = service.deposit("1001", 5000).await?;
    assert_eq!(movement.outcome, Outcome::Applied);
    assert_eq!(movement.balance, 15000);

    let movement = service.withdraw("1001", 20000).await?;
    assert_eq!(
        movement.outcome,
        Outcome::Ignored(IgnoreReason::InsufficientFunds)
    );
    assert_eq!(service.balance("1001").await?, 15000);

    let movement = service.withdraw("1001", 15000).await?;
    assert_eq!(movement.outcome, Outcome::Applied);
    assert_eq!(movement.balance, 0);
    Ok(())
}

#[tokio::test]
async fn test_non_positive_amounts_are_ignored() -> Result<()> {
    let service = service_with_accounts().await?;

    for amount in [0, -1, -10000] {
        let deposit = service.deposit("2002", amount).await?;
        assert_eq!(
            deposit.outcome,
            Outcome::Ignored(IgnoreReason::NonPositiveAmount)
        );
        let withdrawal = service.withdraw("2002", amount).await?;
        assert_eq!(
            withdrawal.outcome,
            Outcome::Ignored(IgnoreReason::NonPositiveAmount)
        );
    }

    assert_eq!(service.balance("2002").await?, 2550);
    Ok(())
}

#[tokio::test]
async fn test_unknown_account_is_not_found() -> Result<()> {
    let service = service_with_accounts().await?;

    assert!(matches!(
        service.balance("1002").await,
        Err(AppError::AccountNotFound(id)) if id == "1002"
    ));
    assert!(matches!(
        service.deposit("1002", 100).await,
        Err(AppError::AccountNotFound(_))
    ));
    assert!(matches!(
        service.withdraw("1002", 100).await,
        Err(AppError::AccountNotFound(_))
    ));
    assert!(matches!(
        service.account("1002").await,
        Err(AppError::AccountNotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_negative_opening_balance_is_kept() -> Result<()> {
    let service = BankService::new();
    service.open_account("3003", "Carol", -2500).await?;
    assert_eq!(service.balance("3003").await?, -2500);

    // Nothing can be withdrawn until the account is back above zero
    let movement = service.withdraw("3003", 100).await?;
    assert!(!movement.outcome.is_applied());
    Ok(())
}

#[tokio::test]
async fn test_list_accounts_sorted() -> Result<()> {
    let service = BankService::new();
    service.open_account("2002", "Bob", 0).await?;
    service.open_account("1001", "Alice", 0).await?;

    let ids: Vec<String> = service
        .list_accounts()
        .await
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["1001", "2002"]);
    Ok(())
}

#[tokio::test]
async fn test_service_over_existing_ledger() -> Result<()> {
    let mut ledger = Ledger::new();
    ledger.create("1001", "Alice", 4200)?;

    let service = BankService::with_ledger(ledger);
    assert_eq!(service.balance("1001").await?, 4200);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deposits_are_not_lost() -> Result<()> {
    let service = BankService::new();
    service.open_account("1001", "Alice", 0).await?;

    let mut handles = Vec::new();
    for _ in 0..50 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                service.deposit("1001", 100).await?;
            }
            Ok::<_, AppError>(())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(service.balance("1001").await?, 50 * 10 * 100);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() -> Result<()> {
    let service = BankService::new();
    service.open_account("1001", "Alice", 1000).await?;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(
            async move { service.withdraw("1001", 300).await },
        ));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await??.outcome.is_applied() {
            applied += 1;
        }
    }

    assert_eq!(applied, 3);
    assert_eq!(service.balance("1001").await?, 100);
    Ok(())
}
