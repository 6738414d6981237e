//! Admin authorization
//!
//! Write routes accept either the configured static admin token or an HS256
//! JWT signed with it.

pub mod model;
pub mod service;

pub use model::{AdminClaims, AdminIdentity, AdminRole, AuthContext, AuthSettings};
pub use service::{authenticate, decode_admin_token, encode_admin_token, require_admin};
