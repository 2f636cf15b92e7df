pub mod common;
pub mod path;
pub mod quiz;
pub mod reward;
pub mod student;
pub mod user;

pub use common::AssignmentStatus;
pub use user::{Role, User};
