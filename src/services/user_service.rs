//! User account service
//!
//! 注册、激活、登录、令牌刷新和密码管理的业务逻辑。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use migration::entities::user;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::jwt::{TokenPurpose, get_jwt_service};
use crate::config::get_config;
use crate::errors::{PlacepinError, Result};
use crate::services::notify::EmailSender;
use crate::services::verification_service::PURPOSE_SIGNUP;
use crate::storage::PlacepinStorage;
use crate::utils::password::{hash_password, verify_password};

// ============ Response DTOs ============

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            nickname: model.nickname,
            phone: model.phone,
            is_active: model.is_active,
            is_staff: model.is_staff,
            created_at: model.created_at,
            last_login: model.last_login,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user_id: i64,
    pub nickname: String,
    pub introduce: Option<String>,
    pub photo: Option<String>,
    pub current_region1: Option<String>,
    pub current_region2: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumImageView {
    pub id: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

// ============ UserService Implementation ============

pub struct UserService {
    storage: Arc<PlacepinStorage>,
    email_sender: Arc<dyn EmailSender>,
}

impl UserService {
    pub fn new(storage: Arc<PlacepinStorage>, email_sender: Arc<dyn EmailSender>) -> Self {
        Self {
            storage,
            email_sender,
        }
    }

    async fn require_user(&self, user_id: i64) -> Result<user::Model> {
        self.storage
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", user_id)))
    }

    fn send_activation_email(&self, user: &user::Model) -> Result<()> {
        let token = get_jwt_service().generate_purpose_token(user.id, TokenPurpose::Activate)?;
        let base = &get_config().verification.activation_base_url;
        let link = format!("{}/users/verify-email/{}/{}", base, user.id, token);

        self.email_sender.send_email(
            &user.email,
            "Activate your account",
            &format!("Click the link to activate your account: {}", link),
        )
    }

    /// 注册新账号
    ///
    /// 提供手机号时必须先通过短信验证码确认。新账号以未激活状态创建，
    /// 激活链接通过邮件送达。
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
        phone: Option<&str>,
    ) -> Result<UserView> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(PlacepinError::validation("invalid email address"));
        }
        if password.len() < 8 {
            return Err(PlacepinError::validation(
                "password must be at least 8 characters",
            ));
        }
        if nickname.trim().is_empty() {
            return Err(PlacepinError::validation("nickname must not be empty"));
        }

        if self.storage.find_user_by_email(email).await?.is_some() {
            return Err(PlacepinError::conflict("email already registered"));
        }
        if let Some(phone) = phone {
            if self.storage.find_user_by_phone(phone).await?.is_some() {
                return Err(PlacepinError::conflict("phone already registered"));
            }
            if !self.storage.has_verified_code(phone, PURPOSE_SIGNUP).await? {
                return Err(PlacepinError::verification_invalid(
                    "phone number is not verified",
                ));
            }
        }

        let password_hash = hash_password(password)?;
        let model = self
            .storage
            .insert_user(
                email,
                Some(password_hash),
                nickname,
                phone.map(|p| p.to_string()),
                false,
            )
            .await?;

        // 验证码一次性消费，避免同一验证注册多个账号
        if let Some(phone) = phone {
            self.storage
                .consume_verified_codes(phone, PURPOSE_SIGNUP)
                .await?;
        }
        self.storage.ensure_profile(model.id).await?;

        self.send_activation_email(&model)?;
        info!("UserService: signed up user {} ({})", model.id, model.email);

        Ok(UserView::from(model))
    }

    /// 通过激活令牌激活账号
    pub async fn activate(&self, token: &str) -> Result<UserView> {
        let user_id = get_jwt_service().validate_purpose_token(token, TokenPurpose::Activate)?;
        let model = self.require_user(user_id).await?;

        if !model.is_active {
            self.storage.set_active(user_id, true).await?;
            info!("UserService: activated user {}", user_id);
        }
        self.require_user(user_id).await.map(UserView::from)
    }

    /// 邮件链接激活：uid 必须与令牌主体一致
    pub async fn verify_email(&self, uid: i64, token: &str) -> Result<UserView> {
        let subject = get_jwt_service().validate_purpose_token(token, TokenPurpose::Activate)?;
        if subject != uid {
            return Err(PlacepinError::token_invalid(
                "token does not match this user",
            ));
        }
        self.activate(token).await
    }

    /// 邮箱 + 密码登录
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let model = self
            .storage
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| PlacepinError::unauthorized("invalid email or password"))?;

        let Some(ref hash) = model.password else {
            // 社交登录账号没有本地密码
            return Err(PlacepinError::unauthorized("invalid email or password"));
        };
        if !verify_password(password, hash)? {
            warn!("UserService: failed login for {}", email);
            return Err(PlacepinError::unauthorized("invalid email or password"));
        }
        if !model.is_active {
            return Err(PlacepinError::forbidden("account is not activated"));
        }

        self.storage.set_last_login(model.id).await?;
        info!("UserService: user {} logged in", model.id);

        self.issue_tokens(model.id)
    }

    pub fn issue_tokens(&self, user_id: i64) -> Result<TokenPair> {
        let jwt = get_jwt_service();
        Ok(TokenPair {
            access_token: jwt.generate_access_token(user_id)?,
            refresh_token: jwt.generate_refresh_token(user_id)?,
        })
    }

    /// 用 refresh token 换新令牌对
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let user_id = get_jwt_service().validate_refresh_token(refresh_token)?;
        let model = self.require_user(user_id).await?;
        if !model.is_active {
            return Err(PlacepinError::forbidden("account is not activated"));
        }
        self.issue_tokens(user_id)
    }

    pub async fn me(&self, user_id: i64) -> Result<UserView> {
        self.require_user(user_id).await.map(UserView::from)
    }

    pub async fn update_account(
        &self,
        user_id: i64,
        nickname: Option<String>,
        phone: Option<String>,
    ) -> Result<UserView> {
        if let Some(ref nickname) = nickname {
            if nickname.trim().is_empty() {
                return Err(PlacepinError::validation("nickname must not be empty"));
            }
        }
        if let Some(ref phone) = phone {
            if let Some(existing) = self.storage.find_user_by_phone(phone).await? {
                if existing.id != user_id {
                    return Err(PlacepinError::conflict("phone already registered"));
                }
            }
        }

        let model = self.storage.update_account(user_id, nickname, phone).await?;
        Ok(UserView::from(model))
    }

    /// 修改密码，需要旧密码
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if new_password.len() < 8 {
            return Err(PlacepinError::validation(
                "password must be at least 8 characters",
            ));
        }

        let model = self.require_user(user_id).await?;
        let Some(ref hash) = model.password else {
            return Err(PlacepinError::forbidden(
                "social accounts have no local password",
            ));
        };
        if !verify_password(old_password, hash)? {
            return Err(PlacepinError::unauthorized("old password is incorrect"));
        }

        let new_hash = hash_password(new_password)?;
        self.storage.set_password(user_id, new_hash).await?;
        info!("UserService: user {} changed password", user_id);
        Ok(())
    }

    /// 发送密码重置邮件
    ///
    /// 邮箱不存在时也返回成功，避免账号枚举。
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let Some(model) = self.storage.find_user_by_email(email).await? else {
            warn!("UserService: password reset requested for unknown email");
            return Ok(());
        };

        let token =
            get_jwt_service().generate_purpose_token(model.id, TokenPurpose::PasswordReset)?;
        let base = &get_config().verification.activation_base_url;
        let link = format!("{}/users/password/reset?token={}", base, token);

        self.email_sender.send_email(
            &model.email,
            "Reset your password",
            &format!("Click the link to reset your password: {}", link),
        )?;
        info!("UserService: sent password reset email to user {}", model.id);
        Ok(())
    }

    /// 用重置令牌设置新密码
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        if new_password.len() < 8 {
            return Err(PlacepinError::validation(
                "password must be at least 8 characters",
            ));
        }

        let user_id =
            get_jwt_service().validate_purpose_token(token, TokenPurpose::PasswordReset)?;
        self.require_user(user_id).await?;

        let new_hash = hash_password(new_password)?;
        self.storage.set_password(user_id, new_hash).await?;
        info!("UserService: user {} reset password", user_id);
        Ok(())
    }

    /// 注销：停用账号，数据保留
    pub async fn deactivate(&self, user_id: i64) -> Result<()> {
        self.require_user(user_id).await?;
        self.storage.set_active(user_id, false).await?;
        info!("UserService: deactivated user {}", user_id);
        Ok(())
    }

    // ============ Profile / Album ============

    pub async fn profile(&self, user_id: i64) -> Result<ProfileView> {
        let user = self.require_user(user_id).await?;
        let profile = self.storage.ensure_profile(user_id).await?;
        Ok(ProfileView {
            user_id,
            nickname: user.nickname,
            introduce: profile.introduce,
            photo: profile.photo,
            current_region1: profile.current_region1,
            current_region2: profile.current_region2,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        changes: crate::storage::ProfileChanges,
    ) -> Result<ProfileView> {
        self.require_user(user_id).await?;
        self.storage.update_profile(user_id, changes).await?;
        self.profile(user_id).await
    }

    /// 设置常用地区（一级必填，二级可选）
    pub async fn set_region(
        &self,
        user_id: i64,
        region1: &str,
        region2: Option<&str>,
    ) -> Result<ProfileView> {
        if region1.trim().is_empty() {
            return Err(PlacepinError::validation("region1 must not be empty"));
        }
        self.require_user(user_id).await?;
        self.storage.set_region(user_id, region1, region2).await?;
        self.profile(user_id).await
    }

    pub async fn album(&self, user_id: i64) -> Result<Vec<AlbumImageView>> {
        self.require_user(user_id).await?;
        let images = self.storage.album_images(user_id).await?;
        Ok(images
            .into_iter()
            .map(|m| AlbumImageView {
                id: m.id,
                image: m.image,
                created_at: m.created_at,
            })
            .collect())
    }

    pub async fn add_album_image(&self, user_id: i64, url: &str) -> Result<AlbumImageView> {
        if url.trim().is_empty() {
            return Err(PlacepinError::validation("image url must not be empty"));
        }
        self.require_user(user_id).await?;
        let model = self.storage.insert_album_image(user_id, url).await?;
        Ok(AlbumImageView {
            id: model.id,
            image: model.image,
            created_at: model.created_at,
        })
    }

    /// 删除相册照片，仅本人
    pub async fn delete_album_image(&self, user_id: i64, image_id: i64) -> Result<()> {
        let image = self
            .storage
            .find_album_image(image_id)
            .await?
            .ok_or_else(|| {
                PlacepinError::not_found(format!("album image {} not found", image_id))
            })?;
        if image.user_id != user_id {
            return Err(PlacepinError::forbidden("only the owner may delete"));
        }
        self.storage.delete_album_image(image_id).await
    }
}
