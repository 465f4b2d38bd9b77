//! 邮件发送
//!
//! 后端由 `email.backend` 选择：`smtp` 通过 lettre 投递，`console` 仅写日志，
//! `memory` 保存在进程内（测试用）。

mod console;
mod memory;
mod smtp;

pub use console::ConsoleMailer;
pub use memory::MemoryMailer;
pub use smtp::SmtpMailer;

use crate::config::EmailConfig;
use crate::errors::{KuetxError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// 待发送邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// 根据配置创建邮件后端
pub fn create_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>> {
    match config.backend.as_str() {
        "smtp" => Ok(Arc::new(SmtpMailer::new(config)?)),
        "console" => Ok(Arc::new(ConsoleMailer::new(&config.from_address))),
        "memory" => Ok(Arc::new(MemoryMailer::default())),
        other => Err(KuetxError::mail_delivery(format!(
            "Unknown email backend: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mailer_backends() {
        let mut config = EmailConfig::default();
        assert!(create_mailer(&config).is_ok());

        config.backend = "memory".into();
        assert!(create_mailer(&config).is_ok());

        config.backend = "pigeon".into();
        assert!(create_mailer(&config).is_err());
    }
}
