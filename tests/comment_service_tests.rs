//! CommentService 集成测试
//!
//! 覆盖两层评论树、回复深度限制、墓碑删除和作者权限。

use std::sync::Arc;

use tempfile::TempDir;

use placepin::errors::PlacepinError;
use placepin::services::{CommentService, PlaceService};
use placepin::storage::backend::{connect_sqlite, run_migrations};
use placepin::storage::{NewPlace, PlacepinStorage};

// =============================================================================
// 测试环境初始化
// =============================================================================

async fn test_storage() -> (TempDir, Arc<PlacepinStorage>) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("comment_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.expect("连接 SQLite 失败");
    run_migrations(&db).await.expect("运行迁移失败");

    let storage = Arc::new(PlacepinStorage::from_connection(db, "sqlite"));
    (temp_dir, storage)
}

async fn create_user(storage: &PlacepinStorage, email: &str, nickname: &str) -> i64 {
    let user = storage
        .insert_user(email, Some("x".to_string()), nickname, None, true)
        .await
        .expect("创建用户失败");
    user.id
}

async fn create_place(storage: &Arc<PlacepinStorage>, author: i64) -> i64 {
    let service = PlaceService::new(storage.clone());
    let view = service
        .create_place(
            author,
            NewPlace {
                title: "Test place".to_string(),
                address: "addr".to_string(),
                category: "cafe".to_string(),
                content: None,
            },
            vec![],
        )
        .await
        .expect("创建地点失败");
    view.id
}

// =============================================================================
// 评论树
// =============================================================================

#[tokio::test]
async fn test_comment_tree_replies_nested_under_parents() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let place = create_place(&storage, author).await;

    let first = service
        .create_comment(place, author, None, "first".to_string())
        .await
        .expect("创建评论失败");
    let second = service
        .create_comment(place, author, None, "second".to_string())
        .await
        .expect("创建评论失败");
    let reply = service
        .create_comment(place, author, Some(first.id), "reply".to_string())
        .await
        .expect("创建回复失败");

    let tree = service.comments_for_place(place).await.expect("评论树失败");

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].id, first.id);
    assert_eq!(tree[0].replies.len(), 1);
    assert_eq!(tree[0].replies[0].id, reply.id);
    assert_eq!(tree[0].replies[0].depth, 1);
    assert_eq!(tree[1].id, second.id);
    assert!(tree[1].replies.is_empty());
    assert_eq!(tree[0].nickname.as_deref(), Some("author"));
}

#[tokio::test]
async fn test_reply_to_reply_is_forbidden() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let place = create_place(&storage, author).await;

    let top = service
        .create_comment(place, author, None, "top".to_string())
        .await
        .expect("创建评论失败");
    let reply = service
        .create_comment(place, author, Some(top.id), "reply".to_string())
        .await
        .expect("创建回复失败");

    let result = service
        .create_comment(place, author, Some(reply.id), "too deep".to_string())
        .await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));
}

#[tokio::test]
async fn test_reply_parent_must_belong_to_same_place() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let place_a = create_place(&storage, author).await;
    let place_b = create_place(&storage, author).await;

    let parent = service
        .create_comment(place_a, author, None, "on a".to_string())
        .await
        .expect("创建评论失败");

    let result = service
        .create_comment(place_b, author, Some(parent.id), "cross".to_string())
        .await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));
}

#[tokio::test]
async fn test_comment_requires_existing_place_and_content() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let place = create_place(&storage, author).await;

    assert!(service
        .create_comment(9999, author, None, "orphan".to_string())
        .await
        .is_err());
    assert!(service
        .create_comment(place, author, None, "   ".to_string())
        .await
        .is_err());
}

// =============================================================================
// 编辑与删除
// =============================================================================

#[tokio::test]
async fn test_update_comment_author_only() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let other = create_user(&storage, "other@test.io", "other").await;
    let place = create_place(&storage, author).await;

    let comment = service
        .create_comment(place, author, None, "original".to_string())
        .await
        .expect("创建评论失败");

    let result = service
        .update_comment(place, comment.id, other, "hijacked".to_string())
        .await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));

    let updated = service
        .update_comment(place, comment.id, author, "edited".to_string())
        .await
        .expect("编辑评论失败");
    assert_eq!(updated.content.as_deref(), Some("edited"));
}

#[tokio::test]
async fn test_delete_leaf_comment_removes_row() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let place = create_place(&storage, author).await;

    let comment = service
        .create_comment(place, author, None, "leaf".to_string())
        .await
        .expect("创建评论失败");

    service
        .delete_comment(place, comment.id, author)
        .await
        .expect("删除评论失败");

    let tree = service.comments_for_place(place).await.expect("评论树失败");
    assert!(tree.is_empty());
}

#[tokio::test]
async fn test_delete_comment_with_replies_tombstones() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let replier = create_user(&storage, "replier@test.io", "replier").await;
    let place = create_place(&storage, author).await;

    let parent = service
        .create_comment(place, author, None, "parent".to_string())
        .await
        .expect("创建评论失败");
    let reply = service
        .create_comment(place, replier, Some(parent.id), "kept".to_string())
        .await
        .expect("创建回复失败");

    service
        .delete_comment(place, parent.id, author)
        .await
        .expect("删除评论失败");

    // 父评论保留占位，内容清空；回复完整保留
    let tree = service.comments_for_place(place).await.expect("评论树失败");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].id, parent.id);
    assert!(tree[0].content.is_none());
    assert_eq!(tree[0].replies.len(), 1);
    assert_eq!(tree[0].replies[0].id, reply.id);
    assert_eq!(tree[0].replies[0].content.as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_delete_comment_author_only() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let other = create_user(&storage, "other@test.io", "other").await;
    let place = create_place(&storage, author).await;

    let comment = service
        .create_comment(place, author, None, "mine".to_string())
        .await
        .expect("创建评论失败");

    let result = service.delete_comment(place, comment.id, other).await;
    assert!(matches!(result, Err(PlacepinError::Forbidden(_))));
}

#[tokio::test]
async fn test_comment_detail_finds_replies() {
    let (_dir, storage) = test_storage().await;
    let service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let place = create_place(&storage, author).await;

    let parent = service
        .create_comment(place, author, None, "parent".to_string())
        .await
        .expect("创建评论失败");
    let reply = service
        .create_comment(place, author, Some(parent.id), "reply".to_string())
        .await
        .expect("创建回复失败");

    let detail = service
        .comment_detail(place, reply.id)
        .await
        .expect("查询评论失败");
    assert_eq!(detail.id, reply.id);
    assert_eq!(detail.parent_id, Some(parent.id));

    // 不属于该地点的评论查不到
    assert!(service.comment_detail(9999, reply.id).await.is_err());
}
