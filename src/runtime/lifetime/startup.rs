use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::services::notify::{ConsoleEmailSender, ConsoleSmsSender, EmailSender, SmsSender};
use crate::services::{
    CommentService, FriendService, PlaceService, UserService, VerificationService,
};
use crate::storage::{PlacepinStorage, StorageFactory};

/// 服务器启动所需的全部组件
pub struct StartupContext {
    pub storage: Arc<PlacepinStorage>,
    pub place_service: PlaceService,
    pub comment_service: CommentService,
    pub user_service: UserService,
    pub friend_service: FriendService,
    pub verification_service: VerificationService,
}

/// 准备服务器启动的上下文
///
/// 包括存储连接、数据库迁移和各业务服务的构建。
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    // 通知通道：邮件与短信。当前为控制台投递，替换实现即可接入真实网关。
    let email_sender: Arc<dyn EmailSender> = Arc::new(ConsoleEmailSender);
    let sms_sender: Arc<dyn SmsSender> = Arc::new(ConsoleSmsSender);

    let place_service = PlaceService::new(storage.clone());
    let comment_service = CommentService::new(storage.clone());
    let user_service = UserService::new(storage.clone(), email_sender);
    let friend_service = FriendService::new(storage.clone());
    let verification_service = VerificationService::new(storage.clone(), sms_sender);

    debug!(
        "Pre-startup processing completed in {:?}",
        start_time.elapsed()
    );

    Ok(StartupContext {
        storage,
        place_service,
        comment_service,
        user_service,
        friend_service,
        verification_service,
    })
}
