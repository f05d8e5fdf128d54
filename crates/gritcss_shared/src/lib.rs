//! Shared functionality
//!
//! This crate supplies the character stream, source locations and error types that are shared
//! between the gritcss crates and binaries.
//!

pub mod byte_stream;
pub mod errors;
