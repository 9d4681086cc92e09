//! Access-token codec and refresh-secret generation.

pub mod claims;
pub mod codec;

pub use claims::AccessClaims;
pub use codec::{
    RefreshSecret, generate_refresh_token, hash_refresh_token, mint_access_token,
    parse_access_token,
};
