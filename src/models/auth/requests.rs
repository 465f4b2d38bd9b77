use serde::Deserialize;

// 用户注册请求
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_name: Option<String>,
}

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    /// 密码
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 获取令牌对
#[derive(Debug, Deserialize)]
pub struct TokenObtainRequest {
    pub username: String,
    pub password: String,
}

// 刷新令牌 / 登出，refresh 缺省时从 cookie 读取
#[derive(Debug, Default, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: Option<String>,
}

// 申请重置密码
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

// 确认重置密码
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub password: String,
    pub confirm_password: String,
}
