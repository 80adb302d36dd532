//! PlaceService 集成测试
//!
//! 覆盖地点 CRUD、点赞 / 收藏开关、收藏列表、搜索排序和分类地区回退。

use std::sync::Arc;

use tempfile::TempDir;

use placepin::services::{CommentService, PlaceService, UserService};
use placepin::services::notify::ConsoleEmailSender;
use placepin::storage::backend::{connect_sqlite, run_migrations};
use placepin::storage::{NewPlace, PlaceChanges, PlaceOrdering, PlacepinStorage};

// =============================================================================
// 测试环境初始化
// =============================================================================

async fn test_storage() -> (TempDir, Arc<PlacepinStorage>) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("place_test.db");
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

fn new_place(title: &str, address: &str, category: &str) -> NewPlace {
    NewPlace {
        title: title.to_string(),
        address: address.to_string(),
        category: category.to_string(),
        content: Some("nice spot".to_string()),
    }
}

// =============================================================================
// 地点 CRUD
// =============================================================================

#[tokio::test]
async fn test_create_and_get_place_with_images() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let view = service
        .create_place(
            author,
            new_place("Cafe Luna", "Seoul Mapo-gu", "cafe"),
            vec!["http://img/1.jpg".to_string(), "http://img/2.jpg".to_string()],
        )
        .await
        .expect("创建地点失败");

    assert_eq!(view.title, "Cafe Luna");
    assert_eq!(view.images.len(), 2);
    assert_eq!(view.comment_count, 0);

    let detail = service
        .place_detail(view.id, None)
        .await
        .expect("获取详情失败");
    assert_eq!(detail.place.id, view.id);
    assert!(!detail.liked);
    assert!(!detail.bookmarked);
}

#[tokio::test]
async fn test_create_place_rejects_blank_fields() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let result = service
        .create_place(author, new_place("", "addr", "cafe"), vec![])
        .await;
    assert!(result.is_err());

    let result = service
        .create_place(author, new_place("title", "  ", "cafe"), vec![])
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_place_partial() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let view = service
        .create_place(author, new_place("Old title", "addr", "cafe"), vec![])
        .await
        .expect("创建地点失败");

    let updated = service
        .update_place(
            view.id,
            PlaceChanges {
                title: Some("New title".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("更新地点失败");

    assert_eq!(updated.title, "New title");
    assert_eq!(updated.address, "addr");
    assert_eq!(updated.category, "cafe");
}

#[tokio::test]
async fn test_delete_place_then_not_found() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let view = service
        .create_place(author, new_place("Gone", "addr", "cafe"), vec![])
        .await
        .expect("创建地点失败");

    service.delete_place(view.id).await.expect("删除地点失败");
    assert!(service.place_detail(view.id, None).await.is_err());
    assert!(service.delete_place(view.id).await.is_err());
}

#[tokio::test]
async fn test_list_places_pagination() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    for i in 0..5 {
        service
            .create_place(author, new_place(&format!("Place {}", i), "addr", "cafe"), vec![])
            .await
            .expect("创建地点失败");
    }

    let (page1, total) = service.list_places(1, 2).await.expect("列表失败");
    assert_eq!(total, 5);
    assert_eq!(page1.len(), 2);

    let (page3, _) = service.list_places(3, 2).await.expect("列表失败");
    assert_eq!(page3.len(), 1);
}

// =============================================================================
// 点赞 / 收藏
// =============================================================================

#[tokio::test]
async fn test_toggle_like_twice_restores_state() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let viewer = create_user(&storage, "viewer@test.io", "viewer").await;

    let place = service
        .create_place(author, new_place("Likeable", "addr", "cafe"), vec![])
        .await
        .expect("创建地点失败");

    assert!(service.toggle_like(place.id, viewer).await.expect("点赞失败"));
    let detail = service
        .place_detail(place.id, Some(viewer))
        .await
        .expect("获取详情失败");
    assert!(detail.liked);
    assert_eq!(detail.place.like_count, 1);

    // 第二次切换取消点赞
    assert!(!service.toggle_like(place.id, viewer).await.expect("取消点赞失败"));
    let detail = service
        .place_detail(place.id, Some(viewer))
        .await
        .expect("获取详情失败");
    assert!(!detail.liked);
    assert_eq!(detail.place.like_count, 0);
}

#[tokio::test]
async fn test_toggle_like_missing_place_fails() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let viewer = create_user(&storage, "viewer@test.io", "viewer").await;

    assert!(service.toggle_like(9999, viewer).await.is_err());
}

#[tokio::test]
async fn test_bookmarked_places_recent_first_capped() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;
    let viewer = create_user(&storage, "viewer@test.io", "viewer").await;

    let mut ids = Vec::new();
    for i in 0..6 {
        let place = service
            .create_place(author, new_place(&format!("Spot {}", i), "addr", "cafe"), vec![])
            .await
            .expect("创建地点失败");
        service
            .toggle_bookmark(place.id, viewer)
            .await
            .expect("收藏失败");
        ids.push(place.id);
    }

    let bookmarks = service
        .bookmarked_places(viewer)
        .await
        .expect("收藏列表失败");

    // 最多 4 条，最近收藏的在前
    assert_eq!(bookmarks.len(), 4);
    assert_eq!(bookmarks[0].id, ids[5]);
    assert_eq!(bookmarks[3].id, ids[2]);
}

// =============================================================================
// 搜索
// =============================================================================

#[tokio::test]
async fn test_search_orders_by_comment_count() {
    let (_dir, storage) = test_storage().await;
    let place_service = PlaceService::new(storage.clone());
    let comment_service = CommentService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let quiet = place_service
        .create_place(author, new_place("Ramen quiet", "addr", "food"), vec![])
        .await
        .expect("创建地点失败");
    let busy = place_service
        .create_place(author, new_place("Ramen busy", "addr", "food"), vec![])
        .await
        .expect("创建地点失败");

    for i in 0..3 {
        comment_service
            .create_comment(busy.id, author, None, format!("comment {}", i))
            .await
            .expect("创建评论失败");
    }
    comment_service
        .create_comment(quiet.id, author, None, "one".to_string())
        .await
        .expect("创建评论失败");

    let (results, total) = place_service
        .search("Ramen", PlaceOrdering::CommentCount, 1, 10)
        .await
        .expect("搜索失败");

    assert_eq!(total, 2);
    assert_eq!(results[0].id, busy.id);
    assert_eq!(results[0].comment_count, 3);
    assert_eq!(results[1].id, quiet.id);
}

#[tokio::test]
async fn test_search_no_match_returns_empty() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    service
        .create_place(author, new_place("Cafe Luna", "addr", "cafe"), vec![])
        .await
        .expect("创建地点失败");

    let (results, total) = service
        .search("nowhere", PlaceOrdering::CreatedAtDesc, 1, 10)
        .await
        .expect("搜索失败");
    assert_eq!(total, 0);
    assert!(results.is_empty());
}

// =============================================================================
// 分类浏览的地区回退
// =============================================================================

#[tokio::test]
async fn test_category_places_region_fallback() {
    let (_dir, storage) = test_storage().await;
    let place_service = PlaceService::new(storage.clone());
    let user_service = UserService::new(storage.clone(), Arc::new(ConsoleEmailSender));
    let author = create_user(&storage, "author@test.io", "author").await;
    let viewer = create_user(&storage, "viewer@test.io", "viewer").await;

    place_service
        .create_place(
            author,
            new_place("Mapo cafe", "Seoul Mapo-gu Hapjeong", "cafe"),
            vec![],
        )
        .await
        .expect("创建地点失败");
    place_service
        .create_place(
            author,
            new_place("Stray cafe", "Ilsan Mapo-gu branch", "cafe"),
            vec![],
        )
        .await
        .expect("创建地点失败");
    place_service
        .create_place(
            author,
            new_place("Busan cafe", "Busan Haeundae-gu", "cafe"),
            vec![],
        )
        .await
        .expect("创建地点失败");

    // 一二级地区齐全时，地址必须同时包含两者
    user_service
        .set_region(viewer, "Seoul", Some("Mapo-gu"))
        .await
        .expect("设置地区失败");
    let (results, total) = place_service
        .category_places("cafe", Some(viewer), 1)
        .await
        .expect("分类查询失败");
    assert_eq!(total, 1);
    assert_eq!(results[0].title, "Mapo cafe");

    // 两级组合无匹配时，退到只按一级地区过滤
    user_service
        .set_region(viewer, "Seoul", Some("Gangnam-gu"))
        .await
        .expect("设置地区失败");
    let (results, total) = place_service
        .category_places("cafe", Some(viewer), 1)
        .await
        .expect("分类查询失败");
    assert_eq!(total, 1);
    assert_eq!(results[0].title, "Mapo cafe");

    // 地区设置齐全但两级都无匹配时返回空集，而不是全量
    user_service
        .set_region(viewer, "Jeju", Some("Jeju-si"))
        .await
        .expect("设置地区失败");
    let (results, total) = place_service
        .category_places("cafe", Some(viewer), 1)
        .await
        .expect("分类查询失败");
    assert_eq!(total, 0);
    assert!(results.is_empty());

    // 缺少二级地区时不做地区过滤
    user_service
        .set_region(viewer, "Jeju", None)
        .await
        .expect("设置地区失败");
    let (_, total) = place_service
        .category_places("cafe", Some(viewer), 1)
        .await
        .expect("分类查询失败");
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_category_places_anonymous_viewer_unfiltered() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    service
        .create_place(author, new_place("Anywhere", "addr", "bar"), vec![])
        .await
        .expect("创建地点失败");

    let (_, total) = service
        .category_places("bar", None, 1)
        .await
        .expect("分类查询失败");
    assert_eq!(total, 1);
}

// =============================================================================
// 图片管理
// =============================================================================

#[tokio::test]
async fn test_image_must_belong_to_place() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let a = service
        .create_place(author, new_place("A", "addr", "cafe"), vec!["http://img/a.jpg".to_string()])
        .await
        .expect("创建地点失败");
    let b = service
        .create_place(author, new_place("B", "addr", "cafe"), vec![])
        .await
        .expect("创建地点失败");

    let image_id = a.images[0].id;

    // 通过错误的地点路径操作图片应当失败
    assert!(service.delete_image(b.id, image_id).await.is_err());
    assert!(service
        .update_image(b.id, image_id, "http://img/new.jpg".to_string())
        .await
        .is_err());

    service
        .update_image(a.id, image_id, "http://img/new.jpg".to_string())
        .await
        .expect("更新图片失败");
    service.delete_image(a.id, image_id).await.expect("删除图片失败");

    let detail = service.place_detail(a.id, None).await.expect("获取详情失败");
    assert!(detail.place.images.is_empty());
}

#[tokio::test]
async fn test_add_images_requires_nonempty_list() {
    let (_dir, storage) = test_storage().await;
    let service = PlaceService::new(storage.clone());
    let author = create_user(&storage, "author@test.io", "author").await;

    let place = service
        .create_place(author, new_place("A", "addr", "cafe"), vec![])
        .await
        .expect("创建地点失败");

    assert!(service.add_images(place.id, vec![]).await.is_err());

    let images = service
        .add_images(place.id, vec!["http://img/x.jpg".to_string()])
        .await
        .expect("追加图片失败");
    assert_eq!(images.len(), 1);
}
