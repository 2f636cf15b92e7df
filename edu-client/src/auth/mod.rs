pub mod context;
pub mod session;

pub use context::AuthContext;
pub use session::{Session, SessionSlot};
