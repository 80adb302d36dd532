//! User API 请求类型

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchAccount {
    pub nickname: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordEmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneSendRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneConfirmRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialLoginRequest {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub introduce: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegionUpdateRequest {
    pub region1: String,
    pub region2: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumPostRequest {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub reason: String,
}
