//! Palaver - scripted turn-based conversational agents
//!
//! This crate re-exports all layers of the Palaver system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: palaver_runtime    (chat loop, intent classification, CLI)
//!          palaver_stdlib     (built-in host functions)
//! Layer 2: palaver_engine     (interpreter, templates, pending-input states)
//! Layer 1: palaver_language   (lexer, parser, AST, pretty printer)
//! Layer 0: palaver_foundation (Value, Error)
//! ```

pub use palaver_engine as engine;
pub use palaver_foundation as foundation;
pub use palaver_language as language;
pub use palaver_runtime as runtime;
pub use palaver_stdlib as stdlib;
