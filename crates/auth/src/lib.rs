//! `marketerp-auth`: authentication and module-level authorization.
//!
//! Decoupled from HTTP and from the fulfillment store.

pub mod authenticator;
pub mod authorize;
pub mod claims;
pub mod modules;
pub mod roles;

pub use authenticator::{
    AuthError, Authenticator, Credentials, InMemoryAuthenticator, LoginOutcome, NewAccount,
    UserInfo,
};
pub use authorize::{AuthzError, Principal, authorize};
pub use claims::{Claims, TokenCodec, TokenValidationError, validate_claims};
pub use modules::Module;
pub use roles::{Role, RoleCatalog};
