pub mod auth;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use auth::{AuthContext, Session};
pub use client_core::{ApiError, ErrorKind};
pub use models::{Role, User};
pub use services::{ApiClient, RequestConfig};
