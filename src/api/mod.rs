//! HTTP endpoints of the short-lived local server started by `spotools auth`.
//!
//! - [`callback`] receives the authorization code from Spotify and exchanges
//!   it, together with the PKCE code verifier, for an access token.
//! - [`health`] reports status and version.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
