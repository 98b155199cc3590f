use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use miette::{Diagnostic, SourceSpan};
use rpds::HashTrieMap;
use thiserror::Error;

use crate::ast::{BinaryOp, Function, Location, Term};

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("variable '{name}' is not defined")]
    UnboundVariable {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("expected {expected}, found {found}")]
    TypeError {
        expected: &'static str,
        found: String,
        #[label]
        span: SourceSpan,
    },
    #[error("{found} is not callable")]
    NotCallable {
        found: String,
        #[label]
        span: SourceSpan,
    },
    #[error("expected {expected} argument(s), got {got}")]
    ArityMismatch {
        expected: usize,
        got: usize,
        #[label]
        span: SourceSpan,
    },
    #[error("division by zero")]
    DivisionByZero {
        #[label]
        span: SourceSpan,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Persistent map of bindings. Inserting returns a new scope; the old one
/// stays valid, so closures keep seeing exactly what they captured.
#[derive(Clone, Debug, Default)]
pub struct Scope<'a> {
    vars: HashTrieMap<String, Value<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        self.vars.get(name)
    }

    #[inline]
    pub fn insert(&self, name: String, value: Value<'a>) -> Self {
        Self {
            vars: self.vars.insert(name, value),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value<'a> {
    Int(i64),
    Str(String),
    Bool(bool),
    Pair(Rc<(Value<'a>, Value<'a>)>),
    Closure(Rc<Closure<'a>>),
}

pub struct Closure<'a> {
    fun: &'a Function,
    scope: RefCell<Scope<'a>>,
}

// The captured scope can point back at the closure itself, so Debug stays at
// the surface.
impl fmt::Debug for Closure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("parameters", &self.fun.parameters.len())
            .finish_non_exhaustive()
    }
}

impl Value<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Pair(_) => "pair",
            Value::Closure(_) => "closure",
        }
    }
}

// Host equality. Closures compare by identity; the language's Eq operator
// goes through `values_equal` instead and rejects closures.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Pair(l), Value::Pair(r)) => l.0 == r.0 && l.1 == r.1,
            (Value::Closure(l), Value::Closure(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Str(value) => f.write_str(value),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Pair(pair) => write!(f, "({}, {})", pair.0, pair.1),
            Value::Closure(_) => f.write_str("<#closure>"),
        }
    }
}

/// Evaluates a term under the given scope, sending `print` output to `out`.
pub fn eval<'a>(
    term: &'a Term,
    scope: &Scope<'a>,
    out: &mut dyn Write,
) -> Result<Value<'a>, Error> {
    match term {
        Term::Int { value, .. } => Ok(Value::Int(*value)),
        Term::Str { value, .. } => Ok(Value::Str(value.clone())),
        Term::Bool { value, .. } => Ok(Value::Bool(*value)),
        Term::Tuple { first, second, .. } => {
            let first = eval(first, scope, out)?;
            let second = eval(second, scope, out)?;
            Ok(Value::Pair(Rc::new((first, second))))
        }
        Term::First { value, location } => match eval(value, scope, out)? {
            Value::Pair(pair) => Ok(pair.0.clone()),
            found => Err(Error::TypeError {
                expected: "a pair",
                found: found.kind().to_string(),
                span: location.into(),
            }),
        },
        Term::Second { value, location } => match eval(value, scope, out)? {
            Value::Pair(pair) => Ok(pair.1.clone()),
            found => Err(Error::TypeError {
                expected: "a pair",
                found: found.kind().to_string(),
                span: location.into(),
            }),
        },
        Term::Binary {
            op,
            lhs,
            rhs,
            location,
        } => {
            // Both sides always run, left first; And/Or do not short-circuit.
            let lhs = eval(lhs, scope, out)?;
            let rhs = eval(rhs, scope, out)?;
            binary(*op, lhs, rhs, location)
        }
        Term::If {
            condition,
            then,
            otherwise,
            location,
        } => match eval(condition, scope, out)? {
            Value::Bool(true) => eval(then, scope, out),
            Value::Bool(false) => eval(otherwise, scope, out),
            found => Err(Error::TypeError {
                expected: "a boolean condition",
                found: found.kind().to_string(),
                span: location.into(),
            }),
        },
        Term::Print { value, .. } => {
            let value = eval(value, scope, out)?;
            writeln!(out, "{value}")?;
            Ok(value)
        }
        Term::Let {
            name, value, next, ..
        } => {
            let bound = eval(value, scope, out)?;
            let scope = scope.insert(name.text.clone(), bound.clone());
            // A function literal bound by let can call itself: its captured
            // scope must be the one that already contains the binding.
            if let (Term::Function(_), Value::Closure(closure)) = (value.as_ref(), &bound) {
                *closure.scope.borrow_mut() = scope.clone();
            }
            eval(next, &scope, out)
        }
        Term::Function(fun) => Ok(Value::Closure(Rc::new(Closure {
            fun,
            scope: RefCell::new(scope.clone()),
        }))),
        Term::Call {
            callee,
            arguments,
            location,
        } => {
            let closure = match eval(callee, scope, out)? {
                Value::Closure(closure) => closure,
                found => {
                    return Err(Error::NotCallable {
                        found: found.kind().to_string(),
                        span: callee.location().into(),
                    })
                }
            };
            // The count is syntactic: a bad call fails before any argument
            // runs.
            if closure.fun.parameters.len() != arguments.len() {
                return Err(Error::ArityMismatch {
                    expected: closure.fun.parameters.len(),
                    got: arguments.len(),
                    span: location.into(),
                });
            }
            // Arguments evaluate in the caller's scope, the body in the
            // closure's.
            let mut call_scope = closure.scope.borrow().clone();
            for (param, argument) in closure.fun.parameters.iter().zip(arguments) {
                let value = eval(argument, scope, out)?;
                call_scope = call_scope.insert(param.text.clone(), value);
            }
            eval(&closure.fun.value, &call_scope, out)
        }
        Term::Var { text, location } => match scope.get(text) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::UnboundVariable {
                name: text.clone(),
                span: location.into(),
            }),
        },
    }
}

fn binary<'a>(
    op: BinaryOp,
    lhs: Value<'a>,
    rhs: Value<'a>,
    location: &Location,
) -> Result<Value<'a>, Error> {
    match (op, lhs, rhs) {
        (BinaryOp::Add, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l.wrapping_add(r))),
        // One string operand turns + into concatenation of rendered forms.
        (BinaryOp::Add, l, r) if matches!(l, Value::Str(_)) || matches!(r, Value::Str(_)) => {
            Ok(Value::Str(format!("{l}{r}")))
        }
        (BinaryOp::Sub, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l.wrapping_sub(r))),
        (BinaryOp::Mul, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l.wrapping_mul(r))),
        (BinaryOp::Div, Value::Int(_), Value::Int(0)) => Err(Error::DivisionByZero {
            span: location.into(),
        }),
        (BinaryOp::Div, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l.wrapping_div(r))),
        (BinaryOp::Rem, Value::Int(_), Value::Int(0)) => Err(Error::DivisionByZero {
            span: location.into(),
        }),
        (BinaryOp::Rem, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l.wrapping_rem(r))),
        (BinaryOp::Eq, l, r) => Ok(Value::Bool(values_equal(&l, &r, location)?)),
        (BinaryOp::Neq, l, r) => Ok(Value::Bool(!values_equal(&l, &r, location)?)),
        (BinaryOp::Lt, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l < r)),
        (BinaryOp::Gt, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l > r)),
        (BinaryOp::Lte, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l <= r)),
        (BinaryOp::Gte, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l >= r)),
        (BinaryOp::And, Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(l && r)),
        (BinaryOp::Or, Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(l || r)),
        (op, l, r) => Err(Error::TypeError {
            expected: expected_operands(op),
            found: format!("{} and {}", l.kind(), r.kind()),
            span: location.into(),
        }),
    }
}

// Structural equality for the Eq/Neq operators. Values of different shapes
// are unequal; closures on either side are an error.
fn values_equal(lhs: &Value, rhs: &Value, location: &Location) -> Result<bool, Error> {
    match (lhs, rhs) {
        (Value::Closure(_), _) | (_, Value::Closure(_)) => Err(Error::TypeError {
            expected: "comparable values",
            found: "closure".to_string(),
            span: location.into(),
        }),
        (Value::Int(l), Value::Int(r)) => Ok(l == r),
        (Value::Str(l), Value::Str(r)) => Ok(l == r),
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::Pair(l), Value::Pair(r)) => {
            Ok(values_equal(&l.0, &r.0, location)? && values_equal(&l.1, &r.1, location)?)
        }
        _ => Ok(false),
    }
}

fn expected_operands(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "two integers or a string operand",
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => "two integers",
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => "two integers",
        BinaryOp::And | BinaryOp::Or => "two booleans",
        BinaryOp::Eq | BinaryOp::Neq => "comparable values",
    }
}
