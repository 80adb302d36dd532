//! VerificationService 集成测试
//!
//! 覆盖验证码确认的过期 / 不匹配分支和账号找回的掩码邮箱。

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use placepin::errors::PlacepinError;
use placepin::services::VerificationService;
use placepin::services::notify::ConsoleSmsSender;
use placepin::services::verification_service::{PURPOSE_ACCOUNT, PURPOSE_SIGNUP};
use placepin::storage::backend::{connect_sqlite, run_migrations};
use placepin::storage::PlacepinStorage;

// =============================================================================
// 测试环境初始化
// =============================================================================

async fn test_env() -> (TempDir, Arc<PlacepinStorage>, VerificationService) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("verification_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.expect("连接 SQLite 失败");
    run_migrations(&db).await.expect("运行迁移失败");

    let storage = Arc::new(PlacepinStorage::from_connection(db, "sqlite"));
    let service = VerificationService::new(storage.clone(), Arc::new(ConsoleSmsSender));
    (temp_dir, storage, service)
}

// =============================================================================
// 发送与确认
// =============================================================================

#[tokio::test]
async fn test_send_code_validations() {
    let (_dir, _storage, service) = test_env().await;

    assert!(service.send_code("  ", PURPOSE_SIGNUP).await.is_err());
    assert!(service.send_code("01012345678", "bogus").await.is_err());
    service
        .send_code("01012345678", PURPOSE_SIGNUP)
        .await
        .expect("发送验证码失败");
}

#[tokio::test]
async fn test_confirm_code_happy_path() {
    let (_dir, storage, service) = test_env().await;

    storage
        .insert_verification_code(
            "01012345678",
            "654321",
            PURPOSE_SIGNUP,
            Utc::now() + Duration::minutes(5),
        )
        .await
        .expect("插入验证码失败");

    service
        .confirm_code("01012345678", "654321", PURPOSE_SIGNUP)
        .await
        .expect("确认验证码失败");

    assert!(
        storage
            .has_verified_code("01012345678", PURPOSE_SIGNUP)
            .await
            .expect("查询失败")
    );
}

#[tokio::test]
async fn test_confirm_code_error_branches() {
    let (_dir, storage, service) = test_env().await;

    // 没有发送过验证码
    let result = service.confirm_code("01000000000", "111111", PURPOSE_SIGNUP).await;
    assert!(matches!(result, Err(PlacepinError::VerificationInvalid(_))));

    // 验证码不匹配
    storage
        .insert_verification_code(
            "01012345678",
            "654321",
            PURPOSE_SIGNUP,
            Utc::now() + Duration::minutes(5),
        )
        .await
        .expect("插入验证码失败");
    let result = service.confirm_code("01012345678", "000000", PURPOSE_SIGNUP).await;
    assert!(matches!(result, Err(PlacepinError::VerificationInvalid(_))));

    // 验证码已过期
    storage
        .insert_verification_code(
            "01099999999",
            "654321",
            PURPOSE_SIGNUP,
            Utc::now() - Duration::minutes(1),
        )
        .await
        .expect("插入验证码失败");
    let result = service.confirm_code("01099999999", "654321", PURPOSE_SIGNUP).await;
    assert!(matches!(result, Err(PlacepinError::VerificationInvalid(_))));
}

// =============================================================================
// 账号找回
// =============================================================================

#[tokio::test]
async fn test_confirm_account_returns_masked_email() {
    let (_dir, storage, service) = test_env().await;

    storage
        .insert_user(
            "someone@example.com",
            Some("x".to_string()),
            "someone",
            Some("01055556666".to_string()),
            true,
        )
        .await
        .expect("创建用户失败");

    storage
        .insert_verification_code(
            "01055556666",
            "246810",
            PURPOSE_ACCOUNT,
            Utc::now() + Duration::minutes(5),
        )
        .await
        .expect("插入验证码失败");

    let account = service
        .confirm_account("01055556666", "246810")
        .await
        .expect("账号找回失败");

    assert!(account.email.starts_with("so"));
    assert!(account.email.ends_with("@example.com"));
    assert!(account.email.contains('*'));
    assert!(!account.email.contains("someone"));
}

#[tokio::test]
async fn test_confirm_account_unknown_phone() {
    let (_dir, storage, service) = test_env().await;

    // 验证码正确但手机号没有对应账号
    storage
        .insert_verification_code(
            "01077778888",
            "135790",
            PURPOSE_ACCOUNT,
            Utc::now() + Duration::minutes(5),
        )
        .await
        .expect("插入验证码失败");

    let result = service.confirm_account("01077778888", "135790").await;
    assert!(matches!(result, Err(PlacepinError::NotFound(_))));
}
