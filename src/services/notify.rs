//! 外发通知（邮件 / 短信）
//!
//! 生产部署通过实现这两个 trait 接入真实网关，
//! 默认实现只把内容写进日志，便于开发和测试。

use tracing::info;

use crate::errors::Result;

/// 邮件发送端
pub trait EmailSender: Send + Sync {
    fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// 短信发送端
pub trait SmsSender: Send + Sync {
    fn send_sms(&self, to: &str, body: &str) -> Result<()>;
}

/// 把邮件写进日志的开发用实现
#[derive(Debug, Default, Clone)]
pub struct ConsoleEmailSender;

impl EmailSender for ConsoleEmailSender {
    fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!("Email to {}: [{}] {}", to, subject, body);
        Ok(())
    }
}

/// 把短信写进日志的开发用实现
#[derive(Debug, Default, Clone)]
pub struct ConsoleSmsSender;

impl SmsSender for ConsoleSmsSender {
    fn send_sms(&self, to: &str, body: &str) -> Result<()> {
        info!("SMS to {}: {}", to, body);
        Ok(())
    }
}
