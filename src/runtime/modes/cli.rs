//! CLI mode
//!
//! 管理子命令：迁移数据库、创建员工账号、生成示例配置。

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::cli::{Commands, ConfigCommands};
use crate::storage::StorageFactory;
use crate::utils::password::hash_password;

pub async fn run_cli(command: Commands) -> Result<()> {
    match command {
        Commands::Serve => unreachable!("Serve is handled by server mode"),
        Commands::Migrate => run_migrate().await,
        Commands::CreateStaff {
            email,
            password,
            nickname,
        } => run_create_staff(&email, &password, &nickname).await,
        Commands::Config { action } => run_config(action),
    }
}

/// 建连即跑迁移，所以这里只需要连接一次
async fn run_migrate() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    println!(
        "{} migrations applied ({})",
        "OK".green().bold(),
        storage.backend_name()
    );
    Ok(())
}

async fn run_create_staff(email: &str, password: &str, nickname: &str) -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;

    // 已存在则仅提权，避免重复账号
    if let Some(user) = storage.find_user_by_email(email).await? {
        storage.set_staff(user.id, true).await?;
        println!(
            "{} existing user {} promoted to staff",
            "OK".green().bold(),
            email.cyan()
        );
        return Ok(());
    }

    let hash = hash_password(password)?;
    let user = storage
        .insert_user(email, Some(hash), nickname, None, true)
        .await?;
    storage.set_staff(user.id, true).await?;
    storage.ensure_profile(user.id).await?;

    info!("CLI: staff account created: {}", email);
    println!(
        "{} staff account {} created (id {})",
        "OK".green().bold(),
        email.cyan(),
        user.id
    );
    Ok(())
}

fn run_config(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Generate { output_path } => {
            let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());
            let sample = crate::config::StaticConfig::generate_sample_config();
            std::fs::write(&path, sample)
                .with_context(|| format!("Failed to write {}", path))?;
            println!("{} sample config written to {}", "OK".green().bold(), path);
            Ok(())
        }
    }
}
