use serde::{Deserialize, Serialize};

/// 业务错误码，出现在响应体的 `code` 字段中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,
    ValidationFailed = 1006,

    // 认证 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,
    AccountInactive = 2002,
    AccountSuspended = 2003,
    TokenInvalid = 2004,
    VerificationLinkInvalid = 2005,
    ResetLinkInvalid = 2006,
    PasswordMismatch = 2007,

    // 用户 3xxx
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameAlreadyExists = 3004,
    UserEmailAlreadyExists = 3005,
    UserUpdateFailed = 3006,
    UserDeleteFailed = 3007,
    CanNotDeleteCurrentUser = 3008,

    // 课程 4xxx
    CourseNotFound = 4000,
    CourseCreationFailed = 4001,
    CoursePermissionDenied = 4002,
    ContentNotFound = 4003,

    // 论坛 5xxx
    PostNotFound = 5000,
    PostPermissionDenied = 5001,

    // 测验 6xxx
    QuizCategoryNotFound = 6000,
    QuizCategoryAlreadyExists = 6001,
    QuizInvalid = 6002,

    // 开发日志 7xxx
    DevlogNotFound = 7000,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
