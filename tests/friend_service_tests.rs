//! FriendService 集成测试
//!
//! 覆盖好友请求全生命周期、关系状态、推荐与举报。

use std::sync::Arc;

use tempfile::TempDir;

use placepin::errors::PlacepinError;
use placepin::services::FriendService;
use placepin::services::friend_service::RecommendFilter;
use placepin::storage::backend::{connect_sqlite, run_migrations};
use placepin::storage::{FriendshipStatus, PlacepinStorage};

// =============================================================================
// 测试环境初始化
// =============================================================================

async fn test_env() -> (TempDir, Arc<PlacepinStorage>, FriendService) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("friend_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.expect("连接 SQLite 失败");
    run_migrations(&db).await.expect("运行迁移失败");

    let storage = Arc::new(PlacepinStorage::from_connection(db, "sqlite"));
    let service = FriendService::new(storage.clone());
    (temp_dir, storage, service)
}

async fn create_user(storage: &PlacepinStorage, email: &str, nickname: &str) -> i64 {
    let user = storage
        .insert_user(email, Some("x".to_string()), nickname, None, true)
        .await
        .expect("创建用户失败");
    storage.ensure_profile(user.id).await.expect("创建资料失败");
    user.id
}

// =============================================================================
// 请求生命周期
// =============================================================================

#[tokio::test]
async fn test_request_accept_lifecycle() {
    let (_dir, storage, service) = test_env().await;
    let alice = create_user(&storage, "alice@test.io", "alice").await;
    let bob = create_user(&storage, "bob@test.io", "bob").await;

    let request_id = service.send_request(alice, bob).await.expect("发送请求失败");

    assert_eq!(
        service.friendship_status(alice, bob).await.expect("状态失败"),
        FriendshipStatus::PendingSent
    );
    assert_eq!(
        service.friendship_status(bob, alice).await.expect("状态失败"),
        FriendshipStatus::PendingReceived
    );

    // 只有接收方能处理
    let result = service.accept_request(request_id, alice).await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));

    service
        .accept_request(request_id, bob)
        .await
        .expect("接受请求失败");

    assert_eq!(
        service.friendship_status(alice, bob).await.expect("状态失败"),
        FriendshipStatus::Friends
    );

    // 双方的好友列表都能看到对方
    let alice_friends = service.friends_of(alice).await.expect("好友列表失败");
    let bob_friends = service.friends_of(bob).await.expect("好友列表失败");
    assert_eq!(alice_friends.len(), 1);
    assert_eq!(alice_friends[0].id, bob);
    assert_eq!(bob_friends[0].id, alice);

    // 已处理的请求不能再次处理
    let result = service.accept_request(request_id, bob).await;
    assert!(matches!(result, Err(PlacepinError::Conflict(_))));
}

#[tokio::test]
async fn test_reject_then_resend() {
    let (_dir, storage, service) = test_env().await;
    let alice = create_user(&storage, "alice@test.io", "alice").await;
    let bob = create_user(&storage, "bob@test.io", "bob").await;

    let request_id = service.send_request(alice, bob).await.expect("发送请求失败");
    service
        .reject_request(request_id, bob)
        .await
        .expect("拒绝请求失败");

    assert_eq!(
        service.friendship_status(alice, bob).await.expect("状态失败"),
        FriendshipStatus::Rejected
    );

    // 被拒后可以重新发起
    let new_id = service.send_request(alice, bob).await.expect("重发请求失败");
    assert_ne!(new_id, request_id);
    assert_eq!(
        service.friendship_status(bob, alice).await.expect("状态失败"),
        FriendshipStatus::PendingReceived
    );
}

#[tokio::test]
async fn test_send_request_guards() {
    let (_dir, storage, service) = test_env().await;
    let alice = create_user(&storage, "alice@test.io", "alice").await;
    let bob = create_user(&storage, "bob@test.io", "bob").await;

    // 不能加自己
    assert!(matches!(
        service.send_request(alice, alice).await,
        Err(PlacepinError::Validation(_))
    ));
    // 目标必须存在
    assert!(matches!(
        service.send_request(alice, 9999).await,
        Err(PlacepinError::NotFound(_))
    ));

    service.send_request(alice, bob).await.expect("发送请求失败");
    // 待处理时不能重复发送
    assert!(matches!(
        service.send_request(alice, bob).await,
        Err(PlacepinError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_pending_requests_list() {
    let (_dir, storage, service) = test_env().await;
    let alice = create_user(&storage, "alice@test.io", "alice").await;
    let bob = create_user(&storage, "bob@test.io", "bob").await;
    let carol = create_user(&storage, "carol@test.io", "carol").await;

    service.send_request(alice, carol).await.expect("发送请求失败");
    service.send_request(bob, carol).await.expect("发送请求失败");

    let pending = service.pending_requests(carol).await.expect("待处理失败");
    assert_eq!(pending.len(), 2);
    let nicknames: Vec<_> = pending.iter().map(|r| r.from_nickname.clone()).collect();
    assert!(nicknames.contains(&Some("alice".to_string())));
    assert!(nicknames.contains(&Some("bob".to_string())));
}

#[tokio::test]
async fn test_remove_friend() {
    let (_dir, storage, service) = test_env().await;
    let alice = create_user(&storage, "alice@test.io", "alice").await;
    let bob = create_user(&storage, "bob@test.io", "bob").await;

    // 还不是好友时解除失败
    assert!(service.remove_friend(alice, bob).await.is_err());

    let request_id = service.send_request(alice, bob).await.expect("发送请求失败");
    service.accept_request(request_id, bob).await.expect("接受失败");

    // 任一方都可以解除
    service.remove_friend(bob, alice).await.expect("解除失败");
    assert_eq!(
        service.friendship_status(alice, bob).await.expect("状态失败"),
        FriendshipStatus::None
    );
    assert!(service.friends_of(alice).await.expect("好友列表失败").is_empty());
}

// =============================================================================
// 推荐
// =============================================================================

#[tokio::test]
async fn test_recommend_excludes_self_and_friends() {
    let (_dir, storage, service) = test_env().await;
    let me = create_user(&storage, "me@test.io", "me").await;
    let friend = create_user(&storage, "friend@test.io", "friend").await;
    let stranger = create_user(&storage, "stranger@test.io", "stranger").await;

    let request_id = service.send_request(me, friend).await.expect("发送请求失败");
    service.accept_request(request_id, friend).await.expect("接受失败");

    let recs = service
        .recommend(me, RecommendFilter::New)
        .await
        .expect("推荐失败");
    let ids: Vec<_> = recs.iter().map(|r| r.id).collect();
    assert!(ids.contains(&stranger));
    assert!(!ids.contains(&me));
    assert!(!ids.contains(&friend));
}

#[tokio::test]
async fn test_recommend_region_matches_profile() {
    let (_dir, storage, service) = test_env().await;
    let me = create_user(&storage, "me@test.io", "me").await;
    let neighbor = create_user(&storage, "neighbor@test.io", "neighbor").await;
    let faraway = create_user(&storage, "faraway@test.io", "faraway").await;

    storage.set_region(me, "Seoul", None).await.expect("设置地区失败");
    storage
        .set_region(neighbor, "Seoul", Some("Mapo-gu"))
        .await
        .expect("设置地区失败");
    storage.set_region(faraway, "Busan", None).await.expect("设置地区失败");

    let recs = service
        .recommend(me, RecommendFilter::Region)
        .await
        .expect("推荐失败");
    let ids: Vec<_> = recs.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![neighbor]);
}

#[tokio::test]
async fn test_recommend_region_without_profile_falls_back_to_new() {
    let (_dir, storage, service) = test_env().await;
    let me = create_user(&storage, "me@test.io", "me").await;
    let other = create_user(&storage, "other@test.io", "other").await;

    // 没设置地区时退化为新用户推荐
    let recs = service
        .recommend(me, RecommendFilter::Region)
        .await
        .expect("推荐失败");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, other);
}

#[tokio::test]
async fn test_recommend_filter_parse() {
    assert!(RecommendFilter::parse("region").is_ok());
    assert!(RecommendFilter::parse("new").is_ok());
    assert!(RecommendFilter::parse("hot").is_err());
}

// =============================================================================
// 举报
// =============================================================================

#[tokio::test]
async fn test_report_user_once_per_pair() {
    let (_dir, storage, service) = test_env().await;
    let alice = create_user(&storage, "alice@test.io", "alice").await;
    let bob = create_user(&storage, "bob@test.io", "bob").await;

    assert!(service.report_user(alice, alice, "spam").await.is_err());
    assert!(service.report_user(alice, bob, "  ").await.is_err());
    assert!(service.report_user(alice, 9999, "spam").await.is_err());

    service
        .report_user(alice, bob, "spam")
        .await
        .expect("举报失败");
    let result = service.report_user(alice, bob, "spam again").await;
    assert!(matches!(result, Err(PlacepinError::Conflict(_))));

    // 反方向举报不受影响
    service
        .report_user(bob, alice, "harassment")
        .await
        .expect("反向举报失败");
}
