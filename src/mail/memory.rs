use super::{EmailMessage, Mailer};
use crate::errors::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// 进程内邮箱
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    /// 最近一封发给 `to` 的邮件
    pub fn last_to(&self, to: &str) -> Option<EmailMessage> {
        self.outbox().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(message);
        }
        Ok(())
    }
}
