//! Session token issuing, verification, refresh, and revocation.

pub mod claims;
pub mod codec;
pub mod error;
pub mod revocation;

pub use claims::{Claims, SessionToken};
pub use codec::TokenCodec;
pub use error::{ExpiredToken, TokenError};
pub use revocation::RevocationList;
