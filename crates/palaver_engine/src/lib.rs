//! Interpreter and runtime for Palaver scripts.
//!
//! This crate provides:
//! - [`Engine`] - Per-conversation interpreter driven one turn at a time
//! - [`Evaluator`] - Fail-soft expression evaluation
//! - [`FunctionRegistry`] - Host functions invoked by `call` statements
//! - [`TemplateProcessor`] - `{{...}}` markers and `$name` interpolation in replies
//! - [`WaitState`] / [`WaitRoutes`] - The pending-input state machine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod engine;
pub mod eval;
pub mod ops;
pub mod registry;
pub mod template;
pub mod wait;

pub use config::EngineConfig;
pub use engine::{Engine, Turn, USER_INPUT};
pub use eval::{Evaluator, PatternCache, Variables};
pub use registry::{FunctionRegistry, HostFn};
pub use template::TemplateProcessor;
pub use wait::{WAITING_FOR, WaitRoutes, WaitState};
