use miette::SourceSpan;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct File {
    pub name: String,
    pub expression: Term,
    pub location: Location,
}

/// Byte range in the source the tree was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub filename: String,
}

impl From<&Location> for SourceSpan {
    fn from(location: &Location) -> Self {
        (location.start, location.end.saturating_sub(location.start)).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    pub text: String,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Function {
    pub parameters: Vec<Param>,
    pub value: Box<Term>,
    pub location: Location,
}

// Mirrors the wire format: nodes are JSON objects discriminated by "kind".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum Term {
    Int {
        value: i64,
        location: Location,
    },
    Str {
        value: String,
        location: Location,
    },
    Bool {
        value: bool,
        location: Location,
    },
    Tuple {
        first: Box<Term>,
        second: Box<Term>,
        location: Location,
    },
    First {
        value: Box<Term>,
        location: Location,
    },
    Second {
        value: Box<Term>,
        location: Location,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Term>,
        rhs: Box<Term>,
        location: Location,
    },
    If {
        condition: Box<Term>,
        then: Box<Term>,
        otherwise: Box<Term>,
        location: Location,
    },
    Print {
        value: Box<Term>,
        location: Location,
    },
    Let {
        name: Param,
        value: Box<Term>,
        next: Box<Term>,
        location: Location,
    },
    Function(Function),
    Call {
        callee: Box<Term>,
        arguments: Vec<Term>,
        location: Location,
    },
    Var {
        text: String,
        location: Location,
    },
}

impl Term {
    pub fn location(&self) -> &Location {
        match self {
            Term::Int { location, .. }
            | Term::Str { location, .. }
            | Term::Bool { location, .. }
            | Term::Tuple { location, .. }
            | Term::First { location, .. }
            | Term::Second { location, .. }
            | Term::Binary { location, .. }
            | Term::If { location, .. }
            | Term::Print { location, .. }
            | Term::Let { location, .. }
            | Term::Call { location, .. }
            | Term::Var { location, .. } => location,
            Term::Function(fun) => &fun.location,
        }
    }
}
