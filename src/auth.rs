//! Normalized auth-domain values: platforms, credentials, access tokens, and user profiles.

pub mod credentials;
pub mod platform;
pub mod profile;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use platform::*;
pub use profile::*;
pub use secret::*;
pub use token::*;
