//! Credential material and the caller-owned session value.

pub mod secret;
pub mod session;
pub mod token;

pub use secret::*;
pub use session::*;
pub use token::*;
