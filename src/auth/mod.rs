//! Authentication: identity token decoding, sign-in flows and session resolution.
//!
//! - `token`: structural decode of `header.payload.signature` identity tokens
//! - `signin`: federated (domain allow-listed) and guest sign-in
//! - `session`: merges federated and cached custom sessions into one identity

pub mod session;
pub mod signin;
pub mod token;

pub use session::{
    resolve_identity, select_source, FederatedProvider, FederatedSession, IdentitySource,
    NoFederatedProvider, SessionResolver, StaticFederatedProvider,
};
pub use signin::{check_domain, sign_in_federated, sign_in_guest};
pub use token::{decode_claims, encode_unsigned, IdentityClaims};
