//! Auth-domain keys, secrets, and the stored access-credential model.

pub mod credentials;
pub mod id;
pub mod secret;

pub use credentials::*;
pub use id::*;
pub use secret::*;
