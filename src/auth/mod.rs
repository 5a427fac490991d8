pub mod extract;
pub mod verifier;

pub use extract::{AuthUser, RequireAdmin, RequireInstructor};
pub use verifier::{FirebaseTokenVerifier, StaticTokenVerifier, TokenVerifier, VerifiedIdentity};
