//! Authentication core.
//!
//! This module provides:
//! - `claims`: structural JWT decoding and the expiry policy
//! - `TokenStore`: the persisted single-slot credential store
//! - `SessionManager`: login, logout, validity, and the background sweep
//!
//! The session is a single fact - a token is either entirely present in the
//! store or entirely absent - and every transition to absent (logout, expiry,
//! server rejection) is idempotent, so redundant triggers are harmless.

pub mod claims;
pub mod session;
pub mod store;

pub use claims::{decode_token, expires_in, token_expired, ClaimsError, TokenClaims, CLOCK_SKEW_MS};
pub use session::{SessionManager, SweepHandle};
pub use store::TokenStore;
