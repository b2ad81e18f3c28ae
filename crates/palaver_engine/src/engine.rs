//! The dialogue engine.
//!
//! An [`Engine`] owns a parsed script and the runtime state of one
//! conversation: the variable store, the pending-input marker, and the host
//! function registry. Each call to [`Engine::process`] runs one intent to
//! completion and returns the turn's reply.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use palaver_foundation::{Error, ErrorContext, ErrorKind, Result, Value};
use palaver_language::{CallStmt, ElseBranch, Expr, IfStmt, Parser, Script, Section, Stmt};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, WAIT_ROUTE_PREFIX};
use crate::eval::{Evaluator, PatternCache, Variables};
use crate::registry::FunctionRegistry;
use crate::template::TemplateProcessor;
use crate::wait::{WAITING_FOR, WaitRoutes, WaitState};

/// The variable holding the current turn's raw input.
pub const USER_INPUT: &str = "user_input";

/// Output of a single turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Turn {
    /// The intent that actually ran (after wait-state remapping).
    pub intent: String,
    /// Reply texts in execution order.
    pub replies: Vec<String>,
    /// Texts produced by `log` statements.
    pub logs: Vec<String>,
}

impl Turn {
    /// The replies joined with newlines; empty when nothing was said.
    #[must_use]
    pub fn reply(&self) -> String {
        self.replies.join("\n")
    }
}

/// A script interpreter holding one conversation's state.
#[derive(Debug)]
pub struct Engine {
    script: Arc<Script>,
    config: EngineConfig,
    /// Variables as initialised from `config` and `var` sections.
    defaults: Variables,
    variables: Variables,
    waiting_for: Option<WaitState>,
    routes: WaitRoutes,
    /// Script-local function aliases.
    aliases: HashMap<String, String>,
    registry: FunctionRegistry,
    templates: TemplateProcessor,
    patterns: PatternCache,
    history: VecDeque<String>,
    /// The raw input of the turn in progress.
    turn_input: Value,
    last_intent: Option<String>,
    /// Recovered lexer diagnostics.
    diagnostics: Vec<Error>,
}

impl Engine {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Parses `source` and builds an engine with default configuration.
    ///
    /// # Errors
    /// Returns an error holding every diagnostic if the script fails to parse.
    pub fn from_source(source: &str) -> Result<Self> {
        Self::from_source_with_config(source, EngineConfig::default())
    }

    /// Parses `source` and builds an engine.
    ///
    /// # Errors
    /// Returns an error holding every diagnostic if the script fails to parse.
    pub fn from_source_with_config(source: &str, config: EngineConfig) -> Result<Self> {
        let mut parser = Parser::new(source);
        let parsed = parser.parse_script();
        let diagnostics = parser.take_diagnostics();

        for diagnostic in &diagnostics {
            warn!(source = ?config.source_name, "{diagnostic}");
        }

        let script = parsed.map_err(|err| {
            let mut context = ErrorContext::new();
            if let Some(name) = &config.source_name {
                context = context.with_source(name.clone());
            }
            if let Some(line) = err.line() {
                context = context.with_line(line as usize);
            }
            err.with_context(context)
        })?;

        let mut engine = Self::from_script(script, config);
        engine.diagnostics = diagnostics;
        Ok(engine)
    }

    /// Reads and parses the script at `path`.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a script error if
    /// it fails to parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_config(path, EngineConfig::default())
    }

    /// Reads and parses the script at `path` with `config`.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a script error if
    /// it fails to parse.
    pub fn from_file_with_config(path: impl AsRef<Path>, mut config: EngineConfig) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|err| {
            Error::from(err).with_context(ErrorContext::new().with_source(name.clone()))
        })?;
        if config.source_name.is_none() {
            config.source_name = Some(name);
        }
        Self::from_source_with_config(&source, config)
    }

    /// Builds an engine over an already-parsed script.
    #[must_use]
    pub fn from_script(script: Script, config: EngineConfig) -> Self {
        let mut patterns = PatternCache::new();
        let defaults = initial_variables(&script, &mut patterns);

        let mut routes = WaitRoutes::builtin();
        routes.extend(config.wait_routes.iter().cloned());
        routes.extend(script_wait_routes(&script, &defaults));
        for (state, intent) in routes.retain_defined(|intent| script.intent(intent).is_some()) {
            debug!(state = %state, intent = %intent, "wait route target is not defined; route ignored");
        }

        let aliases = script
            .function_aliases()
            .map(|alias| (alias.alias.clone(), alias.target.clone()))
            .collect();

        let waiting_for = defaults
            .get(WAITING_FOR)
            .and_then(|value| WaitState::parse(&value.to_text()));

        debug!(
            intents = script.intents().count(),
            variables = defaults.len(),
            routes = routes.len(),
            "script loaded"
        );

        Self {
            script: Arc::new(script),
            templates: TemplateProcessor::new(config.seed),
            config,
            variables: defaults.clone(),
            defaults,
            waiting_for,
            routes,
            aliases,
            registry: FunctionRegistry::new(),
            patterns,
            history: VecDeque::new(),
            turn_input: Value::empty(),
            last_intent: None,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Turns
    // =========================================================================

    /// Runs one turn and returns the reply text.
    ///
    /// An unknown intent yields a diagnostic listing the available intents
    /// and leaves all state untouched.
    pub fn process(&mut self, intent: &str, user_input: &str) -> String {
        match self.process_turn(intent, user_input) {
            Ok(turn) => turn.reply(),
            Err(err) => err.to_string(),
        }
    }

    /// Runs one turn and returns its full outcome.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownIntent`] if the intent (after wait-state
    /// remapping) is not defined; nothing is mutated in that case.
    pub fn process_turn(&mut self, intent: &str, user_input: &str) -> Result<Turn> {
        let script = Arc::clone(&self.script);
        let (name, consumes_wait) = self.resolve_intent(intent);

        let Some(target) = script.intent(&name) else {
            debug!(intent = %name, "unknown intent");
            return Err(Error::unknown_intent(name, script.intent_names()));
        };

        debug!(intent = %name, requested = intent, "processing turn");

        self.turn_input = Value::string(user_input);
        self.variables
            .insert(USER_INPUT.to_string(), self.turn_input.clone());
        self.record_input(user_input);
        if consumes_wait {
            self.set_waiting_for(None);
        }
        self.last_intent = Some(name.clone());

        let mut turn = Turn {
            intent: name,
            ..Turn::default()
        };
        self.exec_block(&target.body, &mut turn);

        debug!(
            intent = %turn.intent,
            replies = turn.replies.len(),
            waiting_for = ?self.waiting_for,
            "turn complete"
        );
        Ok(turn)
    }

    /// Applies the wait-state remapping table.
    ///
    /// Returns the intent to run and whether it consumes the pending state.
    fn resolve_intent(&self, requested: &str) -> (String, bool) {
        let route = self
            .waiting_for
            .as_ref()
            .and_then(|state| self.routes.route(state).map(|target| (state, target)));
        match route {
            Some((state, target)) => {
                if target != requested {
                    debug!(state = %state, requested, target, "pending input remaps intent");
                }
                (target.to_string(), true)
            }
            None => (requested.to_string(), false),
        }
    }

    fn record_input(&mut self, user_input: &str) {
        if user_input.is_empty() || self.config.history_limit == 0 {
            return;
        }
        self.history.push_back(user_input.to_string());
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
    }

    // =========================================================================
    // Statement execution
    // =========================================================================

    fn exec_block(&mut self, body: &[Stmt], turn: &mut Turn) {
        for stmt in body {
            self.exec(stmt, turn);
        }
    }

    fn exec(&mut self, stmt: &Stmt, turn: &mut Turn) {
        match stmt {
            Stmt::Reply(expr, _) => {
                let text = self.render(expr);
                turn.replies.push(text);
            }
            Stmt::Log(expr, _) => {
                let text = self.render(expr);
                info!(target: "palaver::script", intent = %turn.intent, "{text}");
                turn.logs.push(text);
            }
            Stmt::Set { name, value, .. } => {
                let value = self.evaluator().eval(value);
                self.assign(name, value);
            }
            Stmt::Call(call) => self.exec_call(call),
            Stmt::If(stmt) => self.exec_if(stmt, turn),
        }
    }

    fn exec_if(&mut self, stmt: &IfStmt, turn: &mut Turn) {
        if self.evaluator().eval_condition(&stmt.condition) {
            self.exec_block(&stmt.then_branch, turn);
            return;
        }
        match &stmt.else_branch {
            None => {}
            Some(ElseBranch::Else(body)) => self.exec_block(body, turn),
            Some(ElseBranch::ElseIf(nested)) => self.exec_if(nested, turn),
        }
    }

    fn exec_call(&mut self, call: &CallStmt) {
        let args: Vec<Value> = {
            let mut evaluator =
                Evaluator::new(&self.variables, &mut self.patterns)
                    .with_binding(USER_INPUT, self.turn_input.clone());
            call.args.iter().map(|arg| evaluator.eval(arg)).collect()
        };
        let function = self
            .aliases
            .get(&call.function)
            .cloned()
            .unwrap_or_else(|| call.function.clone());

        match self.registry.call(&function, &args) {
            Ok(value) => {
                if let Some(target) = &call.target {
                    self.assign(target, value);
                }
            }
            Err(Error {
                kind: ErrorKind::UnregisteredFunction(_),
                ..
            }) => {
                warn!(function = %function, line = call.span.line, "call to unregistered function ignored");
            }
            Err(err) => {
                warn!(function = %function, line = call.span.line, error = %err, "host function failed; no result");
            }
        }
    }

    fn evaluator(&mut self) -> Evaluator<'_> {
        Evaluator::new(&self.variables, &mut self.patterns)
    }

    /// Evaluates `expr` with its string literals run through the template
    /// processor.
    fn render(&mut self, expr: &Expr) -> String {
        Evaluator::new(&self.variables, &mut self.patterns)
            .with_templates(&mut self.templates)
            .eval(expr)
            .to_text()
    }

    fn assign(&mut self, name: &str, value: Value) {
        if name == WAITING_FOR {
            self.set_waiting_for(WaitState::parse(&value.to_text()));
        } else {
            self.variables.insert(name.to_string(), value);
        }
    }

    fn set_waiting_for(&mut self, state: Option<WaitState>) {
        if self.waiting_for != state {
            debug!(from = ?self.waiting_for, to = ?state, "wait state changed");
        }
        let text = state.as_ref().map_or("", WaitState::as_str);
        self.variables
            .insert(WAITING_FOR.to_string(), Value::string(text));
        self.waiting_for = state;
    }

    // =========================================================================
    // Introspection and control
    // =========================================================================

    /// Restores variables to their script defaults and clears the wait state,
    /// input history and last intent. Host registrations are kept.
    pub fn reset(&mut self) {
        self.variables = self.defaults.clone();
        self.waiting_for = self
            .defaults
            .get(WAITING_FOR)
            .and_then(|value| WaitState::parse(&value.to_text()));
        self.history.clear();
        self.turn_input = Value::empty();
        self.last_intent = None;
        self.templates = TemplateProcessor::new(self.config.seed);
        debug!("engine reset");
    }

    /// Intent names in declaration order.
    #[must_use]
    pub fn intents(&self) -> Vec<String> {
        self.script.intent_names()
    }

    /// Returns true if the script defines `name`.
    #[must_use]
    pub fn has_intent(&self, name: &str) -> bool {
        self.script.intent(name).is_some()
    }

    /// The current variable store.
    #[must_use]
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Looks up one variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// The pending-input state, if any.
    #[must_use]
    pub fn waiting_state(&self) -> Option<&WaitState> {
        self.waiting_for.as_ref()
    }

    /// The declared remapping table.
    #[must_use]
    pub fn wait_routes(&self) -> &WaitRoutes {
        &self.routes
    }

    /// The intent run by the most recent successful turn.
    #[must_use]
    pub fn last_intent(&self) -> Option<&str> {
        self.last_intent.as_deref()
    }

    /// Non-empty inputs received so far, oldest first.
    pub fn input_history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Registers a host function.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register(name, function);
    }

    /// The host function registry.
    #[must_use]
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Mutable access to the host function registry.
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// The parsed script.
    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// The configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lexer diagnostics recovered from while loading the script.
    #[must_use]
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }
}

/// Evaluates `config` and `var` entries in source order.
///
/// Later entries may refer to earlier ones.
fn initial_variables(script: &Script, patterns: &mut PatternCache) -> Variables {
    let mut variables = Variables::new();
    variables.insert(USER_INPUT.to_string(), Value::empty());
    variables.insert(WAITING_FOR.to_string(), Value::empty());

    for section in &script.sections {
        let entries = match section {
            Section::Config(entries, _) | Section::Var(entries, _) => entries,
            Section::Function(..) | Section::Intent(_) => continue,
        };
        for entry in entries {
            let value = Evaluator::new(&variables, patterns).eval(&entry.value);
            variables.insert(entry.name.clone(), value);
        }
    }

    if let Some(value) = variables.get(WAITING_FOR) {
        let normalized = WaitState::parse(&value.to_text())
            .map_or_else(Value::empty, |state| Value::string(state.as_str()));
        variables.insert(WAITING_FOR.to_string(), normalized);
    }

    variables
}

/// Routes declared by `config` entries named `wait_<state>`.
fn script_wait_routes(script: &Script, defaults: &Variables) -> Vec<(WaitState, String)> {
    script
        .config_entries()
        .filter_map(|entry| {
            let state = WaitState::parse(entry.name.strip_prefix(WAIT_ROUTE_PREFIX)?)?;
            let intent = defaults.get(&entry.name)?.to_text();
            Some((state, intent))
        })
        .collect()
}
