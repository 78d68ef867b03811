// Application layer: the session-facing service over the domain ledger,
// the PIN gate that guards it, and report assembly.

pub mod auth;
pub mod error;
pub mod reporting;
pub mod service;

pub use auth::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
