//! 手机短信验证码服务

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::constants::PHONE_CODE_LENGTH;
use crate::config::get_config;
use crate::errors::{PlacepinError, Result};
use crate::services::notify::SmsSender;
use crate::storage::PlacepinStorage;
use crate::utils::{generate_numeric_code, mask_email};

/// 注册前的手机验证
pub const PURPOSE_SIGNUP: &str = "signup";
/// 找回账号（返回掩码邮箱）
pub const PURPOSE_ACCOUNT: &str = "account";

#[derive(Debug, Clone, Serialize)]
pub struct MaskedAccount {
    pub email: String,
}

pub struct VerificationService {
    storage: Arc<PlacepinStorage>,
    sms_sender: Arc<dyn SmsSender>,
}

impl VerificationService {
    pub fn new(storage: Arc<PlacepinStorage>, sms_sender: Arc<dyn SmsSender>) -> Self {
        Self {
            storage,
            sms_sender,
        }
    }

    fn validate_purpose(purpose: &str) -> Result<()> {
        match purpose {
            PURPOSE_SIGNUP | PURPOSE_ACCOUNT => Ok(()),
            other => Err(PlacepinError::validation(format!(
                "unknown verification purpose: {}",
                other
            ))),
        }
    }

    /// 生成并发送验证码
    pub async fn send_code(&self, phone: &str, purpose: &str) -> Result<()> {
        Self::validate_purpose(purpose)?;
        if phone.trim().is_empty() {
            return Err(PlacepinError::validation("phone must not be empty"));
        }

        let code = generate_numeric_code(PHONE_CODE_LENGTH);
        let ttl = get_config().verification.code_ttl_secs;
        let expires_at = Utc::now() + Duration::seconds(ttl as i64);

        self.storage
            .insert_verification_code(phone, &code, purpose, expires_at)
            .await?;
        self.sms_sender
            .send_sms(phone, &format!("Your verification code is {}", code))?;

        info!("VerificationService: sent {} code to {}", purpose, phone);
        Ok(())
    }

    /// 校验验证码并标记已确认
    pub async fn confirm_code(&self, phone: &str, code: &str, purpose: &str) -> Result<()> {
        Self::validate_purpose(purpose)?;

        let record = self
            .storage
            .latest_unverified_code(phone, purpose)
            .await?
            .ok_or_else(|| {
                PlacepinError::verification_invalid("no verification code was requested")
            })?;

        if record.expires_at <= Utc::now() {
            return Err(PlacepinError::verification_invalid(
                "verification code has expired",
            ));
        }
        if record.code != code {
            return Err(PlacepinError::verification_invalid(
                "verification code does not match",
            ));
        }

        self.storage.mark_code_verified(record.id).await?;
        info!("VerificationService: confirmed {} code for {}", purpose, phone);
        Ok(())
    }

    /// 找回账号：验证码确认后返回掩码邮箱
    pub async fn confirm_account(&self, phone: &str, code: &str) -> Result<MaskedAccount> {
        self.confirm_code(phone, code, PURPOSE_ACCOUNT).await?;

        let user = self
            .storage
            .find_user_by_phone(phone)
            .await?
            .ok_or_else(|| PlacepinError::not_found("no account for this phone number"))?;

        Ok(MaskedAccount {
            email: mask_email(&user.email),
        })
    }
}
