//! Request and response data transfer objects.

pub mod auth;
pub mod error;

pub use auth::{
    LoginRequest, LogoutResponse, RefreshTokenRequest, SessionResponse, TokenResponse,
};
pub use error::ErrorResponse;
