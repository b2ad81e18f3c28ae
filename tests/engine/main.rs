//! Integration tests for Layer 2: Engine
//!
//! Tests for turn processing, the pending-input state machine, host
//! functions, and reply templates.

mod functions;
mod state;
mod templates;
