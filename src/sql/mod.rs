//! SQL text generation.
//!
//! - [`token`] - Token types the query builders emit
//! - [`extract`] - Best-effort projection extraction from query text

pub mod extract;
pub mod token;

#[cfg(test)]
pub mod test_utils;

pub use extract::extract_projection;
pub use token::{Token, TokenStream};
