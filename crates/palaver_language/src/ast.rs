//! Abstract Syntax Tree for Palaver scripts.
//!
//! A [`Script`] is an ordered list of [`Section`]s. Nodes are immutable once
//! the parser has built them and each carries the [`Span`] it came from.

use crate::span::Span;

/// A parsed script.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Script {
    /// Sections in source order.
    pub sections: Vec<Section>,
}

impl Script {
    /// Iterates over the intents in declaration order.
    pub fn intents(&self) -> impl Iterator<Item = &Intent> {
        self.sections.iter().filter_map(|section| match section {
            Section::Intent(intent) => Some(intent),
            _ => None,
        })
    }

    /// Finds an intent by name.
    #[must_use]
    pub fn intent(&self, name: &str) -> Option<&Intent> {
        self.intents().find(|intent| intent.name == name)
    }

    /// Returns the intent names in declaration order.
    #[must_use]
    pub fn intent_names(&self) -> Vec<String> {
        self.intents().map(|intent| intent.name.clone()).collect()
    }

    /// Iterates over every `config` entry, across all config sections.
    pub fn config_entries(&self) -> impl Iterator<Item = &Binding> {
        self.sections.iter().flat_map(|section| match section {
            Section::Config(entries, _) => entries.as_slice(),
            _ => &[][..],
        })
    }

    /// Iterates over every `var` entry, across all var sections.
    pub fn var_entries(&self) -> impl Iterator<Item = &Binding> {
        self.sections.iter().flat_map(|section| match section {
            Section::Var(entries, _) => entries.as_slice(),
            _ => &[][..],
        })
    }

    /// Iterates over every `function` alias.
    pub fn function_aliases(&self) -> impl Iterator<Item = &FunctionAlias> {
        self.sections.iter().flat_map(|section| match section {
            Section::Function(aliases, _) => aliases.as_slice(),
            _ => &[][..],
        })
    }

    /// Returns a copy with every span reset, for structural comparison.
    #[must_use]
    pub fn without_spans(&self) -> Self {
        Self {
            sections: self.sections.iter().map(Section::without_spans).collect(),
        }
    }
}

/// A top-level block.
#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    /// `config` entries.
    Config(Vec<Binding>, Span),
    /// `var` entries.
    Var(Vec<Binding>, Span),
    /// `function` aliases.
    Function(Vec<FunctionAlias>, Span),
    /// `intent "name"` with its statements.
    Intent(Intent),
}

impl Section {
    /// Returns the source span of this section.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Config(_, s) | Self::Var(_, s) | Self::Function(_, s) => *s,
            Self::Intent(intent) => intent.span,
        }
    }

    /// A human-readable name for this section kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Config(..) => "config",
            Self::Var(..) => "var",
            Self::Function(..) => "function",
            Self::Intent(_) => "intent",
        }
    }

    fn without_spans(&self) -> Self {
        match self {
            Self::Config(entries, _) => Self::Config(
                entries.iter().map(Binding::without_spans).collect(),
                Span::default(),
            ),
            Self::Var(entries, _) => Self::Var(
                entries.iter().map(Binding::without_spans).collect(),
                Span::default(),
            ),
            Self::Function(aliases, _) => Self::Function(
                aliases
                    .iter()
                    .map(|alias| FunctionAlias {
                        span: Span::default(),
                        ..alias.clone()
                    })
                    .collect(),
                Span::default(),
            ),
            Self::Intent(intent) => Self::Intent(Intent {
                name: intent.name.clone(),
                body: strip_block(&intent.body),
                span: Span::default(),
            }),
        }
    }
}

/// `name = expr` inside a `config` or `var` section.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    /// Variable name.
    pub name: String,
    /// Initial value expression.
    pub value: Expr,
    /// Source location.
    pub span: Span,
}

impl Binding {
    fn without_spans(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.without_spans(),
            span: Span::default(),
        }
    }
}

/// `alias = "host_name"` inside a `function` section.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionAlias {
    /// Name used by `call` statements in this script.
    pub alias: String,
    /// Name the host registered the function under.
    pub target: String,
    /// Source location.
    pub span: Span,
}

/// A named unit of dialogue behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct Intent {
    /// Intent name, unique within a script.
    pub name: String,
    /// Statements executed in order.
    pub body: Vec<Stmt>,
    /// Source location of the `intent` keyword.
    pub span: Span,
}

/// A statement inside an intent.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `reply expr`
    Reply(Expr, Span),
    /// `log expr`
    Log(Expr, Span),
    /// `set name = expr`
    Set {
        /// Target variable.
        name: String,
        /// Value expression.
        value: Expr,
        /// Source location.
        span: Span,
    },
    /// `call [target =] function(args)`
    Call(CallStmt),
    /// `if ... end`
    If(IfStmt),
}

impl Stmt {
    /// Returns the source span of this statement.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Reply(_, s) | Self::Log(_, s) | Self::Set { span: s, .. } => *s,
            Self::Call(call) => call.span,
            Self::If(stmt) => stmt.span,
        }
    }

    /// Returns true if executing this statement can change the variable store.
    #[must_use]
    pub fn mutates_state(&self) -> bool {
        match self {
            Self::Reply(..) | Self::Log(..) => false,
            Self::Set { .. } | Self::Call(_) => true,
            Self::If(stmt) => stmt.mutates_state(),
        }
    }

    fn without_spans(&self) -> Self {
        match self {
            Self::Reply(expr, _) => Self::Reply(expr.without_spans(), Span::default()),
            Self::Log(expr, _) => Self::Log(expr.without_spans(), Span::default()),
            Self::Set { name, value, .. } => Self::Set {
                name: name.clone(),
                value: value.without_spans(),
                span: Span::default(),
            },
            Self::Call(call) => Self::Call(CallStmt {
                target: call.target.clone(),
                function: call.function.clone(),
                args: call.args.iter().map(Expr::without_spans).collect(),
                span: Span::default(),
            }),
            Self::If(stmt) => Self::If(stmt.without_spans()),
        }
    }
}

fn strip_block(body: &[Stmt]) -> Vec<Stmt> {
    body.iter().map(Stmt::without_spans).collect()
}

/// A host function invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct CallStmt {
    /// Variable receiving the result, if any.
    pub target: Option<String>,
    /// Function name (alias or registered name).
    pub function: String,
    /// Positional argument expressions.
    pub args: Vec<Expr>,
    /// Source location.
    pub span: Span,
}

/// A conditional with an optional else part.
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    /// Condition expression.
    pub condition: Expr,
    /// Statements run when the condition holds.
    pub then_branch: Vec<Stmt>,
    /// What runs otherwise.
    pub else_branch: Option<ElseBranch>,
    /// Source location of the `if` keyword.
    pub span: Span,
}

impl IfStmt {
    /// Returns true if any branch contains a `set` or `call`.
    #[must_use]
    pub fn mutates_state(&self) -> bool {
        self.then_branch.iter().any(Stmt::mutates_state)
            || match &self.else_branch {
                None => false,
                Some(ElseBranch::Else(body)) => body.iter().any(Stmt::mutates_state),
                Some(ElseBranch::ElseIf(nested)) => nested.mutates_state(),
            }
    }

    fn without_spans(&self) -> Self {
        Self {
            condition: self.condition.without_spans(),
            then_branch: strip_block(&self.then_branch),
            else_branch: self.else_branch.as_ref().map(|branch| match branch {
                ElseBranch::Else(body) => ElseBranch::Else(strip_block(body)),
                ElseBranch::ElseIf(nested) => ElseBranch::ElseIf(Box::new(nested.without_spans())),
            }),
            span: Span::default(),
        }
    }
}

/// The two shapes an `else` can take.
///
/// `else` followed by statements is [`ElseBranch::Else`]; `else if` is an
/// [`ElseBranch::ElseIf`] wrapping the nested conditional. The parser decides
/// which from the token after `else`, never from how many statements follow.
#[derive(Clone, Debug, PartialEq)]
pub enum ElseBranch {
    /// `else statement+`
    Else(Vec<Stmt>),
    /// `else if ...`
    ElseIf(Box<IfStmt>),
}

/// Arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl ArithOp {
    /// Source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 2,
            Self::Mul | Self::Div => 3,
        }
    }
}

/// Equality operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
}

impl CompareOp {
    /// Source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
        }
    }
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// String literal like `"hello"`
    String(String, Span),
    /// Integer literal like `42`
    Int(i64, Span),
    /// Decimal literal like `2.5`
    Float(f64, Span),
    /// `true` or `false`
    Bool(bool, Span),
    /// `$name`
    Variable(String, Span),
    /// Bare `name`, resolved through the variable store
    Identifier(String, Span),
    /// `lhs op rhs` for `+ - * /`
    Arithmetic {
        /// Operator.
        op: ArithOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Source location.
        span: Span,
    },
    /// `lhs == rhs` or `lhs != rhs`
    Comparison {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Source location.
        span: Span,
    },
    /// `subject matches "pattern"`
    Matches {
        /// Text being tested.
        subject: Box<Expr>,
        /// Regular expression source.
        pattern: String,
        /// Source location.
        span: Span,
    },
    /// `haystack contains needle`
    Contains {
        /// Text being searched.
        haystack: Box<Expr>,
        /// Text searched for.
        needle: Box<Expr>,
        /// Source location.
        span: Span,
    },
}

impl Expr {
    /// Returns the source span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::String(_, s)
            | Self::Int(_, s)
            | Self::Float(_, s)
            | Self::Bool(_, s)
            | Self::Variable(_, s)
            | Self::Identifier(_, s)
            | Self::Arithmetic { span: s, .. }
            | Self::Comparison { span: s, .. }
            | Self::Matches { span: s, .. }
            | Self::Contains { span: s, .. } => *s,
        }
    }

    /// The source line this expression starts on.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.span().line
    }

    /// Binding strength used by the pretty-printer; higher binds tighter.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Comparison { .. } | Self::Matches { .. } | Self::Contains { .. } => 1,
            Self::Arithmetic { op, .. } => op.precedence(),
            _ => 4,
        }
    }

    /// A human-readable type name for this expression node.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(..) => "string",
            Self::Int(..) => "int",
            Self::Float(..) => "float",
            Self::Bool(..) => "bool",
            Self::Variable(..) => "variable",
            Self::Identifier(..) => "identifier",
            Self::Arithmetic { .. } => "arithmetic",
            Self::Comparison { .. } => "comparison",
            Self::Matches { .. } => "matches",
            Self::Contains { .. } => "contains",
        }
    }

    fn without_spans(&self) -> Self {
        let none = Span::default();
        match self {
            Self::String(s, _) => Self::String(s.clone(), none),
            Self::Int(n, _) => Self::Int(*n, none),
            Self::Float(n, _) => Self::Float(*n, none),
            Self::Bool(b, _) => Self::Bool(*b, none),
            Self::Variable(name, _) => Self::Variable(name.clone(), none),
            Self::Identifier(name, _) => Self::Identifier(name.clone(), none),
            Self::Arithmetic { op, lhs, rhs, .. } => Self::Arithmetic {
                op: *op,
                lhs: Box::new(lhs.without_spans()),
                rhs: Box::new(rhs.without_spans()),
                span: none,
            },
            Self::Comparison { op, lhs, rhs, .. } => Self::Comparison {
                op: *op,
                lhs: Box::new(lhs.without_spans()),
                rhs: Box::new(rhs.without_spans()),
                span: none,
            },
            Self::Matches {
                subject, pattern, ..
            } => Self::Matches {
                subject: Box::new(subject.without_spans()),
                pattern: pattern.clone(),
                span: none,
            },
            Self::Contains {
                haystack, needle, ..
            } => Self::Contains {
                haystack: Box::new(haystack.without_spans()),
                needle: Box::new(needle.without_spans()),
                span: none,
            },
        }
    }
}

/// Helper constructors for AST nodes (for testing).
#[cfg(test)]
impl Expr {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into(), Span::default())
    }

    pub fn int(n: i64) -> Self {
        Self::Int(n, Span::default())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into(), Span::default())
    }

    pub fn arith(op: ArithOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Arithmetic {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: Span::default(),
        }
    }
}
