//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_kuetx_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum KuetxError {
            $($variant(String),)*
        }

        impl KuetxError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(KuetxError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(KuetxError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(KuetxError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl KuetxError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        KuetxError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_kuetx_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    MailDelivery("E010", "Mail Delivery Error"),
    TokenGeneration("E011", "Token Generation Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl KuetxError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for KuetxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for KuetxError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for KuetxError {
    fn from(err: sea_orm::DbErr) -> Self {
        KuetxError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for KuetxError {
    fn from(err: std::io::Error) -> Self {
        KuetxError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for KuetxError {
    fn from(err: serde_json::Error) -> Self {
        KuetxError::Serialization(err.to_string())
    }
}

impl From<lettre::error::Error> for KuetxError {
    fn from(err: lettre::error::Error) -> Self {
        KuetxError::MailDelivery(err.to_string())
    }
}

impl From<lettre::address::AddressError> for KuetxError {
    fn from(err: lettre::address::AddressError) -> Self {
        KuetxError::MailDelivery(format!("Invalid address: {err}"))
    }
}

impl From<lettre::transport::smtp::Error> for KuetxError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        KuetxError::MailDelivery(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for KuetxError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        KuetxError::TokenGeneration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KuetxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(KuetxError::cache_connection("test").code(), "E001");
        assert_eq!(KuetxError::database_config("test").code(), "E003");
        assert_eq!(KuetxError::validation("test").code(), "E007");
        assert_eq!(KuetxError::mail_delivery("test").code(), "E010");
        assert_eq!(KuetxError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            KuetxError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            KuetxError::token_generation("test").error_type(),
            "Token Generation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = KuetxError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = KuetxError::not_found("Course 42");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Course 42"));
    }

    #[test]
    fn test_from_address_error() {
        let err: KuetxError = "not an address"
            .parse::<lettre::Address>()
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E010");
        assert!(err.message().starts_with("Invalid address"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: KuetxError = io.into();
        assert_eq!(err.code(), "E006");
    }
}
