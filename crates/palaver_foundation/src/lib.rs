//! Core types for Palaver.
//!
//! This crate provides:
//! - [`Value`] - The primitive value type held in the variable store
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use value::Value;
