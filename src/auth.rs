//! Auth-domain types: consumer credentials and the cached access token.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::{AccessToken, response::*, secret::*, slot::*};
