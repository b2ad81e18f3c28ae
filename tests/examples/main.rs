//! Integration tests for the demo scripts
//!
//! Loads the scripts under `demos/` and drives whole conversations through
//! the engine and the chat loop.

mod support;
