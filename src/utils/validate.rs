//! 账户字段校验

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,16}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

const MIN_PASSWORD_LENGTH: usize = 8;

// 常见弱密码，比较时忽略大小写
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "admin123",
    "abcd1234",
    "welcome1",
    "letmein1",
    "iloveyou1",
    "passw0rd",
    "p@ssw0rd",
];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !(5..=16).contains(&username.chars().count()) {
        return Err("Username length must be between 5 and 16 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 规范化邮箱：域名部分小写
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// 密码校验失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    EntirelyNumeric,
    TooCommon,
    TooSimilarToAccount,
}

impl PasswordIssue {
    pub fn message(self) -> &'static str {
        match self {
            PasswordIssue::TooShort => "Password must be at least 8 characters long",
            PasswordIssue::MissingUppercase => {
                "Password must contain at least one uppercase letter"
            }
            PasswordIssue::MissingLowercase => {
                "Password must contain at least one lowercase letter"
            }
            PasswordIssue::MissingDigit => "Password must contain at least one digit",
            PasswordIssue::EntirelyNumeric => "Password can not be entirely numeric",
            PasswordIssue::TooCommon => "Password is too common",
            PasswordIssue::TooSimilarToAccount => {
                "Password is too similar to the username or email"
            }
        }
    }
}

/// 校验密码强度；提供账户信息时额外检查与用户名/邮箱的相似度
pub fn check_password(password: &str, account: &[&str]) -> Vec<PasswordIssue> {
    let mut issues = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        issues.push(PasswordIssue::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push(PasswordIssue::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        issues.push(PasswordIssue::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push(PasswordIssue::MissingDigit);
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        issues.push(PasswordIssue::EntirelyNumeric);
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|common| password.eq_ignore_ascii_case(common))
    {
        issues.push(PasswordIssue::TooCommon);
    }

    let lowered = password.to_lowercase();
    let similar = account
        .iter()
        .map(|attr| attr.split('@').next().unwrap_or_default().to_lowercase())
        .filter(|attr| attr.len() >= 3)
        .any(|attr| lowered.contains(&attr) || attr.contains(&lowered));
    if similar {
        issues.push(PasswordIssue::TooSimilarToAccount);
    }

    issues
}

/// 校验密码，失败时返回拼接后的错误信息
pub fn validate_password(password: &str, account: &[&str]) -> Result<(), String> {
    let issues = check_password(password, account);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues
            .iter()
            .map(|issue| issue.message())
            .collect::<Vec<_>>()
            .join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_the-builder1").is_ok());
        assert!(validate_username("abcd").is_err());
        assert!(validate_username("abcdefghijklmnopq").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("alicé").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("student@kuet.ac.bd").is_ok());
        assert!(validate_email("first.last+tag@example.com").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("user@@example.com").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Foo@Example.COM "), "Foo@example.com");
    }

    #[test]
    fn test_strong_password() {
        assert!(check_password("SecurePass123", &[]).is_empty());
        assert!(validate_password("MyP@ssw0rd", &["alice", "alice@example.com"]).is_ok());
    }

    #[test]
    fn test_password_issues() {
        assert!(check_password("Ab1", &[]).contains(&PasswordIssue::TooShort));
        assert!(check_password("abcd1234", &[]).contains(&PasswordIssue::MissingUppercase));
        assert!(check_password("ABCD1234", &[]).contains(&PasswordIssue::MissingLowercase));
        assert!(check_password("AbcdEfgh", &[]).contains(&PasswordIssue::MissingDigit));
        assert!(check_password("1234567890", &[]).contains(&PasswordIssue::EntirelyNumeric));
        assert!(check_password("Password1", &[]).contains(&PasswordIssue::TooCommon));
    }

    #[test]
    fn test_password_similar_to_account() {
        let issues = check_password("Charlie2024", &["charlie", "charlie@example.com"]);
        assert_eq!(issues, vec![PasswordIssue::TooSimilarToAccount]);
    }

    #[test]
    fn test_error_message_joined() {
        let err = validate_password("short", &[]).unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("; "));
    }
}
