//! 账户一次性链接令牌（邮箱验证、密码重置）
//!
//! 令牌格式为 `<时间戳 base36>-<HMAC-SHA256 hex>`。签名覆盖用户的若干状态字段，
//! 这些字段变化后旧令牌自动失效，无需落库。

use crate::config::AppConfig;
use crate::models::users::entities::User;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    fn salt(self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "kuetx.accounts.EmailVerificationTokenGenerator",
            TokenPurpose::PasswordReset => "kuetx.accounts.PasswordResetTokenGenerator",
        }
    }

    // 参与签名的用户状态
    fn user_state(self, user: &User) -> String {
        match self {
            // 激活后 status 改变，验证链接失效
            TokenPurpose::EmailVerification => {
                format!("{}{}{}", user.id, user.status, user.email)
            }
            // 修改密码或再次登录后重置链接失效
            TokenPurpose::PasswordReset => {
                let login_ts = user
                    .last_login
                    .map(|t| t.timestamp().to_string())
                    .unwrap_or_default();
                format!("{}{}{}{}", user.id, user.password_hash, login_ts, user.email)
            }
        }
    }
}

pub struct AccountTokenGenerator {
    secret: String,
    ttl: i64,
}

impl AccountTokenGenerator {
    pub fn new(secret: impl Into<String>, ttl: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self::new(config.jwt.secret.clone(), config.tokens.account_token_ttl)
    }

    fn mac(&self, purpose: TokenPurpose, user: &User, timestamp: i64) -> HmacSha256 {
        // 以 salt + secret 派生出每种用途独立的密钥
        let key = Sha256::new()
            .chain_update(purpose.salt())
            .chain_update(&self.secret)
            .finalize();
        let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC can take key of any size");
        mac.update(purpose.user_state(user).as_bytes());
        mac.update(timestamp.to_string().as_bytes());
        mac
    }

    pub fn make_token(&self, purpose: TokenPurpose, user: &User) -> String {
        self.make_token_at(purpose, user, chrono::Utc::now().timestamp())
    }

    fn make_token_at(&self, purpose: TokenPurpose, user: &User, timestamp: i64) -> String {
        let digest = self.mac(purpose, user, timestamp).finalize().into_bytes();
        format!("{}-{}", to_base36(timestamp), hex::encode(digest))
    }

    pub fn check_token(&self, purpose: TokenPurpose, user: &User, token: &str) -> bool {
        self.check_token_at(purpose, user, token, chrono::Utc::now().timestamp())
    }

    fn check_token_at(&self, purpose: TokenPurpose, user: &User, token: &str, now: i64) -> bool {
        let Some((ts_b36, signature)) = token.split_once('-') else {
            return false;
        };
        let Some(timestamp) = from_base36(ts_b36) else {
            return false;
        };
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        if self
            .mac(purpose, user, timestamp)
            .verify_slice(&signature)
            .is_err()
        {
            return false;
        }

        now >= timestamp && now - timestamp <= self.ttl
    }
}

/// 用户 ID 编码为 URL 安全的 base64
pub fn encode_uid(user_id: i64) -> String {
    URL_SAFE_NO_PAD.encode(user_id.to_string())
}

pub fn decode_uid(uidb64: &str) -> Option<i64> {
    let bytes = URL_SAFE_NO_PAD.decode(uidb64).ok()?;
    let id = String::from_utf8(bytes).ok()?.parse::<i64>().ok()?;
    (id > 0).then_some(id)
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 12 {
        return None;
    }
    i64::from_str_radix(s, 36).ok().filter(|v| *v >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserRole, UserStatus};

    const TTL: i64 = 3600;

    fn user() -> User {
        let now = chrono::Utc::now();
        User {
            id: 12,
            username: "learner".into(),
            email: "learner@example.com".into(),
            password_hash: "$argon2id$v=19$hash".into(),
            role: UserRole::Student,
            status: UserStatus::Inactive,
            profile: UserProfile::default(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn generator() -> AccountTokenGenerator {
        AccountTokenGenerator::new("test-secret", TTL)
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let user = user();
        let token = generator().make_token(TokenPurpose::EmailVerification, &user);
        assert!(generator().check_token(TokenPurpose::EmailVerification, &user, &token));
    }

    #[test]
    fn test_token_bound_to_purpose_and_secret() {
        let user = user();
        let token = generator().make_token(TokenPurpose::EmailVerification, &user);
        assert!(!generator().check_token(TokenPurpose::PasswordReset, &user, &token));
        assert!(!AccountTokenGenerator::new("other", TTL).check_token(
            TokenPurpose::EmailVerification,
            &user,
            &token
        ));
    }

    #[test]
    fn test_verification_token_invalid_after_activation() {
        let mut user = user();
        let token = generator().make_token(TokenPurpose::EmailVerification, &user);
        user.status = UserStatus::Active;
        assert!(!generator().check_token(TokenPurpose::EmailVerification, &user, &token));
    }

    #[test]
    fn test_reset_token_invalid_after_password_change() {
        let mut user = user();
        let token = generator().make_token(TokenPurpose::PasswordReset, &user);
        user.password_hash = "$argon2id$v=19$other".into();
        assert!(!generator().check_token(TokenPurpose::PasswordReset, &user, &token));
    }

    #[test]
    fn test_reset_token_invalid_after_login() {
        let mut user = user();
        let token = generator().make_token(TokenPurpose::PasswordReset, &user);
        user.last_login = Some(chrono::Utc::now());
        assert!(!generator().check_token(TokenPurpose::PasswordReset, &user, &token));
    }

    #[test]
    fn test_token_expires() {
        let user = user();
        let issued = 1_700_000_000;
        let token = generator().make_token_at(TokenPurpose::PasswordReset, &user, issued);
        let at_expiry = issued + TTL;
        assert!(generator().check_token_at(TokenPurpose::PasswordReset, &user, &token, at_expiry));
        assert!(!generator().check_token_at(
            TokenPurpose::PasswordReset,
            &user,
            &token,
            issued + TTL + 1
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        let user = user();
        for token in ["", "nodash", "zz-nothex", "-abcd", "1-"] {
            assert!(!generator().check_token(TokenPurpose::PasswordReset, &user, token));
        }
    }

    #[test]
    fn test_uid_round_trip() {
        assert_eq!(encode_uid(12), "MTI");
        assert_eq!(decode_uid(&encode_uid(98765)), Some(98765));
        assert_eq!(decode_uid("!!!"), None);
        assert_eq!(decode_uid(&URL_SAFE_NO_PAD.encode("abc")), None);
        assert_eq!(decode_uid(&encode_uid(0)), None);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(from_base36("10"), Some(36));
        assert_eq!(from_base36(&to_base36(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(from_base36("!"), None);
    }
}
