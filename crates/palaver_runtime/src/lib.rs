//! Chat loop and CLI for Palaver.
//!
//! This crate provides:
//! - [`Chat`] - Interactive loop: classify a line, run the intent, print the reply
//! - [`IntentClassifier`] - The seam for natural-language intent recognition
//! - [`LineEditor`] - Terminal and scripted input sources

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chat;
pub mod classifier;
pub mod editor;

pub use chat::{Chat, DEFAULT_FALLBACK, DEFAULT_START_INTENT, META_COMMANDS, QUIT_WORDS, Response};
pub use classifier::{IntentClassifier, KeywordClassifier, UNKNOWN_INTENT};
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
