//! client-core: shared infrastructure for the learning platform API client.
pub mod error;
pub mod observability;
pub mod token_store;

pub use error::{ApiError, ErrorKind, FieldError};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
