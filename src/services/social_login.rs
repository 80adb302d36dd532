//! 社交登录（Kakao / Naver / Google）
//!
//! 客户端完成 OAuth 流程后把提供方的 access token 发来，
//! 服务端用它换取用户资料并绑定 / 创建本地账号。

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use ureq::Agent;

use crate::config::get_config;
use crate::errors::{PlacepinError, Result};
use crate::services::user_service::{TokenPair, UserService};
use crate::storage::PlacepinStorage;

/// HTTP 请求超时时间
const HTTP_TIMEOUT_SECS: u64 = 5;

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Kakao,
    Naver,
    Google,
}

impl SocialProvider {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "kakao" => Ok(Self::Kakao),
            "naver" => Ok(Self::Naver),
            "google" => Ok(Self::Google),
            other => Err(PlacepinError::validation(format!(
                "unknown social provider: {}",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Naver => "naver",
            Self::Google => "google",
        }
    }

    fn profile_url(&self) -> String {
        let config = get_config();
        match self {
            Self::Kakao => config.social.kakao_profile_url.clone(),
            Self::Naver => config.social.naver_profile_url.clone(),
            Self::Google => config.social.google_profile_url.clone(),
        }
    }
}

/// 从提供方拿到的最小用户资料
#[derive(Debug, Clone)]
pub struct SocialProfile {
    pub provider: SocialProvider,
    pub provider_uid: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
}

/// 用提供方 access token 换取用户资料（同步，在 spawn_blocking 中调用）
fn fetch_profile_sync(provider: SocialProvider, access_token: String) -> Result<SocialProfile> {
    let url = provider.profile_url();
    let agent = get_agent();

    let resp = agent
        .get(&url)
        .header("Authorization", &format!("Bearer {}", access_token))
        .call()
        .map_err(|e| {
            warn!("Social profile request to {} failed: {}", provider.name(), e);
            PlacepinError::social_provider(format!(
                "{} profile request failed: {}",
                provider.name(),
                e
            ))
        })?;

    let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
        PlacepinError::social_provider(format!(
            "{} profile response parse failed: {}",
            provider.name(),
            e
        ))
    })?;

    parse_profile(provider, &json)
}

/// 各提供方资料接口的字段差异都收敛在这里
fn parse_profile(provider: SocialProvider, json: &serde_json::Value) -> Result<SocialProfile> {
    let (uid, email, nickname) = match provider {
        SocialProvider::Kakao => {
            let uid = json["id"]
                .as_i64()
                .map(|v| v.to_string())
                .or_else(|| json["id"].as_str().map(String::from));
            let account = &json["kakao_account"];
            let email = account["email"].as_str().map(String::from);
            let nickname = account["profile"]["nickname"]
                .as_str()
                .or_else(|| json["properties"]["nickname"].as_str())
                .map(String::from);
            (uid, email, nickname)
        }
        SocialProvider::Naver => {
            let body = &json["response"];
            let uid = body["id"].as_str().map(String::from);
            let email = body["email"].as_str().map(String::from);
            let nickname = body["nickname"]
                .as_str()
                .or_else(|| body["name"].as_str())
                .map(String::from);
            (uid, email, nickname)
        }
        SocialProvider::Google => {
            let uid = json["sub"]
                .as_str()
                .or_else(|| json["id"].as_str())
                .map(String::from);
            let email = json["email"].as_str().map(String::from);
            let nickname = json["name"].as_str().map(String::from);
            (uid, email, nickname)
        }
    };

    let provider_uid = uid.ok_or_else(|| {
        PlacepinError::social_provider(format!(
            "{} profile response missing user id",
            provider.name()
        ))
    })?;

    Ok(SocialProfile {
        provider,
        provider_uid,
        email,
        nickname,
    })
}

/// 用提供方 access token 换取用户资料（异步包装）
pub async fn fetch_profile(
    provider: SocialProvider,
    access_token: String,
) -> Result<SocialProfile> {
    // 使用 spawn_blocking 在线程池中执行同步 HTTP 请求
    tokio::task::spawn_blocking(move || fetch_profile_sync(provider, access_token))
        .await
        .map_err(|e| PlacepinError::social_provider(format!("spawn_blocking failed: {}", e)))?
}

/// 社交登录：查找或创建本地账号并签发令牌
///
/// 提供方没有返回邮箱时用 `{provider}_{uid}@social.local` 兜底，
/// 保证账号仍可被唯一定位。社交账号创建即激活、无本地密码。
pub async fn login_with_profile(
    storage: &Arc<PlacepinStorage>,
    user_service: &UserService,
    profile: SocialProfile,
) -> Result<TokenPair> {
    let email = profile.email.clone().unwrap_or_else(|| {
        format!(
            "{}_{}@social.local",
            profile.provider.name(),
            profile.provider_uid
        )
    });

    let user = match storage.find_user_by_email(&email).await? {
        Some(existing) => {
            if !existing.is_active {
                return Err(PlacepinError::forbidden("account is deactivated"));
            }
            existing
        }
        None => {
            let nickname = profile
                .nickname
                .clone()
                .unwrap_or_else(|| format!("{}_{}", profile.provider.name(), profile.provider_uid));
            let created = storage
                .insert_user(&email, None, &nickname, None, true)
                .await?;
            storage.ensure_profile(created.id).await?;
            info!(
                "Social login: created user {} via {}",
                created.id,
                profile.provider.name()
            );
            created
        }
    };

    storage.set_last_login(user.id).await?;
    user_service.issue_tokens(user.id)
}
