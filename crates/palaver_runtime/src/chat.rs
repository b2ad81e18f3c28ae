//! The interactive chat loop.

use crate::classifier::{IntentClassifier, KeywordClassifier, UNKNOWN_INTENT};
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use palaver_engine::Engine;
use palaver_foundation::{Result, Value};
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// Inputs that end the session.
pub const QUIT_WORDS: [&str; 3] = ["quit", "exit", "bye"];

/// Meta commands understood by the loop.
pub const META_COMMANDS: [&str; 4] = [":vars", ":wait", ":intents", ":reset"];

/// Intent run when the session opens.
pub const DEFAULT_START_INTENT: &str = "greeting";

/// Reply used when input is unclassifiable and the script has no `unknown` intent.
pub const DEFAULT_FALLBACK: &str = "Sorry, I didn't understand that.";

/// How many recent replies are handed to the classifier.
const PRIOR_REPLY_LIMIT: usize = 3;

/// What the loop does with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The agent's reply (possibly empty).
    Reply(String),
    /// Output of a meta command.
    Command(String),
    /// The user asked to leave.
    Quit,
    /// Blank input; nothing happens.
    Empty,
}

/// Reads user lines, classifies them, and runs the matching intent.
pub struct Chat<E: LineEditor = RustylineEditor, C: IntentClassifier = KeywordClassifier> {
    editor: E,
    engine: Engine,
    classifier: C,
    start_intent: Option<String>,
    prompt: String,
    fallback: String,
    /// Print each input line back before its reply.
    echo: bool,
    prior_replies: Vec<String>,
}

impl Chat<RustylineEditor> {
    /// Creates a chat over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(engine: Engine) -> Result<Self> {
        Ok(Self::with_editor(engine, RustylineEditor::new()?))
    }
}

impl<E: LineEditor> Chat<E> {
    /// Creates a chat reading from `editor`.
    pub fn with_editor(engine: Engine, mut editor: E) -> Self {
        editor.set_keywords(
            META_COMMANDS
                .iter()
                .chain(QUIT_WORDS.iter())
                .map(|word| (*word).to_string())
                .collect(),
        );
        Self {
            editor,
            engine,
            classifier: KeywordClassifier::new(),
            start_intent: Some(DEFAULT_START_INTENT.to_string()),
            prompt: "> ".to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
            echo: false,
            prior_replies: Vec::new(),
        }
    }
}

impl<E: LineEditor, C: IntentClassifier> Chat<E, C> {
    /// Swaps the intent classifier.
    pub fn with_classifier<D: IntentClassifier>(self, classifier: D) -> Chat<E, D> {
        Chat {
            editor: self.editor,
            engine: self.engine,
            classifier,
            start_intent: self.start_intent,
            prompt: self.prompt,
            fallback: self.fallback,
            echo: self.echo,
            prior_replies: self.prior_replies,
        }
    }

    /// Sets the intent run when the session opens; `None` skips it.
    #[must_use]
    pub fn with_start_intent(mut self, intent: Option<String>) -> Self {
        self.start_intent = intent;
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the reply for unclassifiable input.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Echoes input lines to the output (for batch transcripts).
    #[must_use]
    pub const fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The engine driving this chat.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Mutable access to the engine.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// The line editor.
    #[must_use]
    pub const fn editor(&self) -> &E {
        &self.editor
    }

    /// Runs the loop on stdout until the input ends or the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out)
    }

    /// Runs the loop, writing replies to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run_with(&mut self, out: &mut impl Write) -> Result<()> {
        if let Some(greeting) = self.open() {
            if !greeting.is_empty() {
                writeln!(out, "{greeting}")?;
            }
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if self.echo {
                writeln!(out, "{}{line}", self.prompt)?;
            }

            match self.respond(&line) {
                Response::Quit => break,
                Response::Empty => {}
                Response::Reply(text) | Response::Command(text) => {
                    if !text.is_empty() {
                        writeln!(out, "{text}")?;
                    }
                }
            }
        }

        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    /// Runs the start intent with empty input.
    ///
    /// Returns `None` when there is no start intent or the script lacks it.
    pub fn open(&mut self) -> Option<String> {
        let intent = self.start_intent.clone()?;
        if !self.engine.has_intent(&intent) {
            warn!(%intent, "start intent not defined by script");
            return None;
        }
        let reply = self.engine.process(&intent, "");
        self.remember(&reply);
        Some(reply)
    }

    /// Handles one line of input.
    pub fn respond(&mut self, line: &str) -> Response {
        let input = line.trim();
        if input.is_empty() {
            return Response::Empty;
        }
        self.editor.add_history(input);

        if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
            return Response::Quit;
        }
        if input.starts_with(':') {
            return Response::Command(self.command(input));
        }

        let candidates = self.engine.intents();
        let intent = self
            .classifier
            .recognize_intent(input, &candidates, &self.prior_replies);
        info!(target: "palaver::chat", %intent, "classified input");

        if intent == UNKNOWN_INTENT && !self.engine.has_intent(UNKNOWN_INTENT) && !self.pending_route() {
            debug!("no intent for input, using fallback");
            return Response::Reply(self.fallback.clone());
        }

        let reply = self.engine.process(&intent, input);
        self.remember(&reply);
        Response::Reply(reply)
    }

    /// True if the engine will remap whatever intent it is given.
    fn pending_route(&self) -> bool {
        self.engine
            .waiting_state()
            .and_then(|state| self.engine.wait_routes().route(state))
            .is_some()
    }

    fn remember(&mut self, reply: &str) {
        if reply.is_empty() {
            return;
        }
        self.prior_replies.push(reply.to_string());
        if self.prior_replies.len() > PRIOR_REPLY_LIMIT {
            self.prior_replies.remove(0);
        }
    }

    fn command(&mut self, input: &str) -> String {
        match input {
            ":vars" => self
                .engine
                .variables()
                .iter()
                .map(|(name, value)| format!("{name} = {}", describe(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            ":wait" => self
                .engine
                .waiting_state()
                .map_or_else(|| "not waiting".to_string(), |state| format!("waiting for {state}")),
            ":intents" => self.engine.intents().join(", "),
            ":reset" => {
                self.engine.reset();
                self.prior_replies.clear();
                "State reset.".to_string()
            }
            other => format!(
                "Unknown command {other}. Commands: {}",
                META_COMMANDS.join(", ")
            ),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => format!("{text:?}"),
        other => other.to_string(),
    }
}
