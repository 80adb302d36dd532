use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::{PlacepinError, Result};

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Uses OnceLock for thread-safe lazy initialization.
/// The service is initialized once on first use and reused for all subsequent requests.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Token Claims（access / refresh / 单用途令牌共用同一结构）
///
/// `sub` 是用户 id，`token_type` 区分用途。
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// 单用途令牌的用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    /// 邮箱激活
    Activate,
    /// 密码重置
    PasswordReset,
}

impl TokenPurpose {
    fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Activate => "activate",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
    purpose_token_minutes: u64,
}

impl JwtService {
    pub fn new(
        secret: &str,
        access_token_minutes: u64,
        refresh_token_days: u64,
        purpose_token_minutes: u64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
            purpose_token_minutes,
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        // 获取 JWT secret，如果为空则生成一个安全的随机值
        let jwt_secret = if config.auth.jwt_secret.is_empty() {
            use tracing::warn;
            warn!("JWT secret not configured or empty, generating secure random token");
            crate::utils::generate_secure_token(32)
        } else {
            config.auth.jwt_secret.clone()
        };

        Self::new(
            &jwt_secret,
            config.auth.access_token_minutes,
            config.auth.refresh_token_days,
            config.auth.purpose_token_minutes,
        )
    }

    fn generate(&self, user_id: i64, token_type: &str, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(PlacepinError::from)
    }

    fn validate(&self, token: &str, expected_type: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;

        // Verify token type
        if token_data.claims.token_type != expected_type {
            return Err(PlacepinError::token_invalid(format!(
                "Expected {} token",
                expected_type
            )));
        }

        Ok(token_data.claims)
    }

    /// Generate Access Token (short-lived)
    pub fn generate_access_token(&self, user_id: i64) -> Result<String> {
        self.generate(
            user_id,
            "access",
            Duration::minutes(self.access_token_minutes as i64),
        )
    }

    /// Generate Refresh Token (long-lived)
    pub fn generate_refresh_token(&self, user_id: i64) -> Result<String> {
        self.generate(
            user_id,
            "refresh",
            Duration::days(self.refresh_token_days as i64),
        )
    }

    /// 生成单用途令牌（激活 / 密码重置）
    pub fn generate_purpose_token(&self, user_id: i64, purpose: TokenPurpose) -> Result<String> {
        self.generate(
            user_id,
            purpose.as_str(),
            Duration::minutes(self.purpose_token_minutes as i64),
        )
    }

    /// Validate Access Token, returning the user id
    pub fn validate_access_token(&self, token: &str) -> Result<i64> {
        let claims = self.validate(token, "access")?;
        parse_subject(&claims)
    }

    /// Validate Refresh Token, returning the user id
    pub fn validate_refresh_token(&self, token: &str) -> Result<i64> {
        let claims = self.validate(token, "refresh")?;
        parse_subject(&claims)
    }

    /// 验证单用途令牌，返回用户 id
    pub fn validate_purpose_token(&self, token: &str, purpose: TokenPurpose) -> Result<i64> {
        let claims = self.validate(token, purpose.as_str())?;
        parse_subject(&claims)
    }
}

fn parse_subject(claims: &Claims) -> Result<i64> {
    claims
        .sub
        .parse::<i64>()
        .map_err(|_| PlacepinError::token_invalid("Malformed token subject"))
}
