pub mod requests;
pub mod responses;

pub use requests::{
    LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RefreshTokenRequest,
    RegisterRequest, TokenObtainRequest,
};
pub use responses::{LoginResponse, TokenPairResponse};
