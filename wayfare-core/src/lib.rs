pub mod error;
pub mod identity;
pub mod notify;

pub use error::{DomainError, DomainResult};
pub use identity::{authorize, Action, Actor, Role};
