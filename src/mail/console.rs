use super::{EmailMessage, Mailer};
use crate::errors::Result;
use async_trait::async_trait;
use tracing::info;

/// 将邮件内容输出到日志
pub struct ConsoleMailer {
    from: String,
}

impl ConsoleMailer {
    pub fn new(from: &str) -> Self {
        Self {
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "Email (console backend):\n{}",
            message.body
        );
        Ok(())
    }
}
