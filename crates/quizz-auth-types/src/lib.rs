//! Token types for Quizz services.
//!
//! Provides signed-token claims with validation, and the [`codec::TokenCodec`]
//! that turns a signed token into the opaque string clients carry.

pub mod codec;
pub mod token;
