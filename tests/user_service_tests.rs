//! UserService 集成测试
//!
//! 覆盖注册 / 激活 / 登录链路、令牌刷新、密码修改与重置、
//! 资料与相册权限。

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use placepin::api::jwt::{TokenPurpose, get_jwt_service};
use placepin::errors::PlacepinError;
use placepin::services::UserService;
use placepin::services::notify::ConsoleEmailSender;
use placepin::services::verification_service::PURPOSE_SIGNUP;
use placepin::storage::backend::{connect_sqlite, run_migrations};
use placepin::storage::{PlacepinStorage, ProfileChanges};

// =============================================================================
// 测试环境初始化
// =============================================================================

async fn test_env() -> (TempDir, Arc<PlacepinStorage>, UserService) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("user_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.expect("连接 SQLite 失败");
    run_migrations(&db).await.expect("运行迁移失败");

    let storage = Arc::new(PlacepinStorage::from_connection(db, "sqlite"));
    let service = UserService::new(storage.clone(), Arc::new(ConsoleEmailSender));
    (temp_dir, storage, service)
}

/// 注册并直接激活，返回用户 id
async fn signup_active(service: &UserService, storage: &PlacepinStorage, email: &str) -> i64 {
    let user = service
        .signup(email, "password123", "tester", None)
        .await
        .expect("注册失败");
    storage.set_active(user.id, true).await.expect("激活失败");
    user.id
}

// =============================================================================
// 注册与激活
// =============================================================================

#[tokio::test]
async fn test_signup_validations() {
    let (_dir, _storage, service) = test_env().await;

    assert!(service.signup("no-at-sign", "password123", "nick", None).await.is_err());
    assert!(service.signup("a@b.io", "short", "nick", None).await.is_err());
    assert!(service.signup("a@b.io", "password123", "  ", None).await.is_err());
}

#[tokio::test]
async fn test_signup_duplicate_email_conflict() {
    let (_dir, _storage, service) = test_env().await;

    service
        .signup("dup@test.io", "password123", "first", None)
        .await
        .expect("注册失败");
    let result = service
        .signup("dup@test.io", "password123", "second", None)
        .await;
    assert!(matches!(result, Err(PlacepinError::Conflict(_))));
}

#[tokio::test]
async fn test_signup_with_phone_requires_verified_code() {
    let (_dir, storage, service) = test_env().await;

    // 未验证的手机号不能注册
    let result = service
        .signup("p@test.io", "password123", "nick", Some("01011112222"))
        .await;
    assert!(matches!(result, Err(PlacepinError::VerificationInvalid(_))));

    // 验证通过后注册成功，验证码被一次性消费
    let code = storage
        .insert_verification_code(
            "01011112222",
            "123456",
            PURPOSE_SIGNUP,
            Utc::now() + Duration::minutes(5),
        )
        .await
        .expect("插入验证码失败");
    storage
        .mark_code_verified(code.id)
        .await
        .expect("确认验证码失败");

    let user = service
        .signup("p@test.io", "password123", "nick", Some("01011112222"))
        .await
        .expect("注册失败");
    assert_eq!(user.phone.as_deref(), Some("01011112222"));
    assert!(
        !storage
            .has_verified_code("01011112222", PURPOSE_SIGNUP)
            .await
            .expect("查询验证码失败")
    );
}

#[tokio::test]
async fn test_activation_flow() {
    let (_dir, storage, service) = test_env().await;

    let user = service
        .signup("act@test.io", "password123", "nick", None)
        .await
        .expect("注册失败");
    assert!(!user.is_active);

    // 未激活不能登录
    let result = service.login("act@test.io", "password123").await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));

    let token = get_jwt_service()
        .generate_purpose_token(user.id, TokenPurpose::Activate)
        .expect("生成令牌失败");
    let activated = service.activate(&token).await.expect("激活失败");
    assert!(activated.is_active);

    service
        .login("act@test.io", "password123")
        .await
        .expect("激活后登录失败");

    let _ = storage;
}

#[tokio::test]
async fn test_verify_email_rejects_mismatched_uid() {
    let (_dir, _storage, service) = test_env().await;

    let user = service
        .signup("mail@test.io", "password123", "nick", None)
        .await
        .expect("注册失败");

    let token = get_jwt_service()
        .generate_purpose_token(user.id, TokenPurpose::Activate)
        .expect("生成令牌失败");

    let result = service.verify_email(user.id + 1, &token).await;
    assert!(matches!(result, Err(PlacepinError::TokenInvalid(_))));

    service
        .verify_email(user.id, &token)
        .await
        .expect("邮件激活失败");
}

// =============================================================================
// 登录与令牌
// =============================================================================

#[tokio::test]
async fn test_login_and_refresh() {
    let (_dir, storage, service) = test_env().await;
    let user_id = signup_active(&service, &storage, "login@test.io").await;

    let pair = service
        .login("login@test.io", "password123")
        .await
        .expect("登录失败");
    assert!(!pair.access_token.is_empty());

    // access token 指向本人
    let subject = get_jwt_service()
        .validate_access_token(&pair.access_token)
        .expect("校验失败");
    assert_eq!(subject, user_id);

    let refreshed = service
        .refresh(&pair.refresh_token)
        .await
        .expect("刷新失败");
    assert!(!refreshed.access_token.is_empty());

    // access token 不能当 refresh token 用
    assert!(service.refresh(&pair.access_token).await.is_err());

    // 登录时间已记录
    let model = storage
        .find_user_by_id(user_id)
        .await
        .expect("查询用户失败")
        .expect("用户不存在");
    assert!(model.last_login.is_some());
}

#[tokio::test]
async fn test_login_wrong_credentials_uniform_error() {
    let (_dir, storage, service) = test_env().await;
    signup_active(&service, &storage, "who@test.io").await;

    let unknown = service.login("nobody@test.io", "password123").await;
    let wrong = service.login("who@test.io", "wrong-password").await;
    assert!(matches!(unknown, Err(PlacepinError::Unauthorized(_))));
    assert!(matches!(wrong, Err(PlacepinError::Unauthorized(_))));
}

#[tokio::test]
async fn test_deactivated_account_cannot_login_or_refresh() {
    let (_dir, storage, service) = test_env().await;
    let user_id = signup_active(&service, &storage, "gone@test.io").await;

    let pair = service
        .login("gone@test.io", "password123")
        .await
        .expect("登录失败");

    service.deactivate(user_id).await.expect("注销失败");

    assert!(service.login("gone@test.io", "password123").await.is_err());
    assert!(service.refresh(&pair.refresh_token).await.is_err());
}

// =============================================================================
// 密码管理
// =============================================================================

#[tokio::test]
async fn test_change_password_flow() {
    let (_dir, storage, service) = test_env().await;
    let user_id = signup_active(&service, &storage, "pw@test.io").await;

    let result = service
        .change_password(user_id, "wrong-password", "newpassword1")
        .await;
    assert!(matches!(result, Err(PlacepinError::Unauthorized(_))));

    assert!(service
        .change_password(user_id, "password123", "tiny")
        .await
        .is_err());

    service
        .change_password(user_id, "password123", "newpassword1")
        .await
        .expect("修改密码失败");

    assert!(service.login("pw@test.io", "password123").await.is_err());
    service
        .login("pw@test.io", "newpassword1")
        .await
        .expect("新密码登录失败");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (_dir, storage, service) = test_env().await;
    let user_id = signup_active(&service, &storage, "reset@test.io").await;

    // 未知邮箱不报错，避免账号枚举
    service
        .request_password_reset("unknown@test.io")
        .await
        .expect("未知邮箱应静默成功");
    service
        .request_password_reset("reset@test.io")
        .await
        .expect("发起重置失败");

    let token = get_jwt_service()
        .generate_purpose_token(user_id, TokenPurpose::PasswordReset)
        .expect("生成令牌失败");
    service
        .reset_password(&token, "resetpass99")
        .await
        .expect("重置密码失败");

    service
        .login("reset@test.io", "resetpass99")
        .await
        .expect("重置后登录失败");

    // 激活令牌不能用于重置
    let wrong_purpose = get_jwt_service()
        .generate_purpose_token(user_id, TokenPurpose::Activate)
        .expect("生成令牌失败");
    assert!(service.reset_password(&wrong_purpose, "another99").await.is_err());
}

// =============================================================================
// 账号与资料
// =============================================================================

#[tokio::test]
async fn test_update_account_phone_uniqueness() {
    let (_dir, storage, service) = test_env().await;
    let first = signup_active(&service, &storage, "one@test.io").await;
    let second = signup_active(&service, &storage, "two@test.io").await;

    service
        .update_account(first, None, Some("01099998888".to_string()))
        .await
        .expect("更新账号失败");

    let result = service
        .update_account(second, None, Some("01099998888".to_string()))
        .await;
    assert!(matches!(result, Err(PlacepinError::Conflict(_))));

    // 本人重复提交同一手机号不算冲突
    service
        .update_account(first, Some("renamed".to_string()), Some("01099998888".to_string()))
        .await
        .expect("本人更新失败");
}

#[tokio::test]
async fn test_profile_update_and_region() {
    let (_dir, storage, service) = test_env().await;
    let user_id = signup_active(&service, &storage, "profile@test.io").await;

    let profile = service.profile(user_id).await.expect("查询资料失败");
    assert!(profile.introduce.is_none());

    service
        .update_profile(
            user_id,
            ProfileChanges {
                introduce: Some("hello".to_string()),
                photo: Some("http://img/me.jpg".to_string()),
            },
        )
        .await
        .expect("更新资料失败");

    assert!(service.set_region(user_id, "  ", None).await.is_err());
    service
        .set_region(user_id, "Seoul", Some("Mapo-gu"))
        .await
        .expect("设置地区失败");

    let profile = service.profile(user_id).await.expect("查询资料失败");
    assert_eq!(profile.introduce.as_deref(), Some("hello"));
    assert_eq!(profile.current_region1.as_deref(), Some("Seoul"));
    assert_eq!(profile.current_region2.as_deref(), Some("Mapo-gu"));
}

#[tokio::test]
async fn test_album_owner_checks() {
    let (_dir, storage, service) = test_env().await;
    let owner = signup_active(&service, &storage, "owner@test.io").await;
    let other = signup_active(&service, &storage, "other@test.io").await;

    let image = service
        .add_album_image(owner, "http://img/album1.jpg")
        .await
        .expect("添加照片失败");

    let result = service.delete_album_image(other, image.id).await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));

    service
        .delete_album_image(owner, image.id)
        .await
        .expect("删除照片失败");
    let album = service.album(owner).await.expect("相册失败");
    assert!(album.is_empty());
}
