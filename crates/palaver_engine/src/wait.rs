//! Pending-input state machine.
//!
//! A [`WaitState`] marks that the next turn answers a specific question. The
//! [`WaitRoutes`] table names, for each declared state, the intent that
//! consumes the answer. States without a route fall through to whatever
//! intent the caller asked for.

use std::collections::BTreeMap;
use std::fmt;

/// The reserved variable through which scripts read and set the wait state.
pub const WAITING_FOR: &str = "waiting_for";

/// A pending-input state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WaitState {
    /// Waiting for an order number.
    OrderNumber,
    /// Waiting for a yes/no on a return.
    ReturnConfirm,
    /// Waiting for a free-text problem description.
    IssueDescription,
    /// Waiting for the user's name.
    Name,
    /// A state declared by the script.
    Custom(String),
}

impl WaitState {
    /// Parses a state name. Empty text and `none` mean "not waiting".
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let state = match text.trim() {
            "" | "none" => return None,
            "order_number" => Self::OrderNumber,
            "return_confirm" => Self::ReturnConfirm,
            "issue_description" => Self::IssueDescription,
            "name" => Self::Name,
            other => Self::Custom(other.to_string()),
        };
        Some(state)
    }

    /// The state's name as written in scripts.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderNumber => "order_number",
            Self::ReturnConfirm => "return_confirm",
            Self::IssueDescription => "issue_description",
            Self::Name => "name",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared remapping table: wait state to consuming intent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitRoutes {
    routes: BTreeMap<WaitState, String>,
}

impl WaitRoutes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in routes for the well-known states.
    #[must_use]
    pub fn builtin() -> Self {
        let mut routes = Self::new();
        routes.insert(WaitState::Name, "provide_name");
        routes.insert(WaitState::OrderNumber, "provide_order_number");
        routes.insert(WaitState::ReturnConfirm, "confirm_return");
        routes.insert(WaitState::IssueDescription, "describe_issue");
        routes
    }

    /// Declares (or redeclares) the consumer of `state`.
    pub fn insert(&mut self, state: WaitState, intent: impl Into<String>) {
        self.routes.insert(state, intent.into());
    }

    /// The intent that consumes `state`, if declared.
    #[must_use]
    pub fn route(&self, state: &WaitState) -> Option<&str> {
        self.routes.get(state).map(String::as_str)
    }

    /// Drops routes whose target is not accepted by `is_defined`, returning
    /// the dropped entries.
    pub fn retain_defined(&mut self, is_defined: impl Fn(&str) -> bool) -> Vec<(WaitState, String)> {
        let dropped: Vec<(WaitState, String)> = self
            .routes
            .iter()
            .filter(|(_, intent)| !is_defined(intent))
            .map(|(state, intent)| (state.clone(), intent.clone()))
            .collect();
        for (state, _) in &dropped {
            self.routes.remove(state);
        }
        dropped
    }

    /// Iterates over routes in state order.
    pub fn iter(&self) -> impl Iterator<Item = (&WaitState, &str)> {
        self.routes.iter().map(|(state, intent)| (state, intent.as_str()))
    }

    /// Number of declared routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Extend<(WaitState, String)> for WaitRoutes {
    fn extend<I: IntoIterator<Item = (WaitState, String)>>(&mut self, iter: I) {
        self.routes.extend(iter);
    }
}
