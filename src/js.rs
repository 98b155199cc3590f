//! JavaScript backend: translates a program into a standalone script.

use crate::ast::{BinaryOp, File, Function, Term};

// Runtime shims: `show` mirrors the evaluator's rendering, `print` logs and
// passes its argument through, `and`/`or` keep both operands evaluated.
const PRELUDE: &str = r##"const show = (x) =>
  typeof x === "function" ? "<#closure>"
    : Array.isArray(x) ? `(${show(x[0])}, ${show(x[1])})`
    : `${x}`;
const print = (x) => { console.log(show(x)); return x; };
const and = (l, r) => l && r;
const or = (l, r) => l || r;
"##;

pub fn transpile(file: &File) -> String {
    format!("{PRELUDE}\n{};\n", emit(&file.expression))
}

pub fn emit(term: &Term) -> String {
    match term {
        Term::Int { value, .. } => value.to_string(),
        Term::Str { value, .. } => quote(value),
        Term::Bool { value, .. } => value.to_string(),
        Term::Tuple { first, second, .. } => format!("[{}, {}]", emit(first), emit(second)),
        Term::First { value, .. } => format!("{}[0]", emit(value)),
        Term::Second { value, .. } => format!("{}[1]", emit(value)),
        Term::Binary { op, lhs, rhs, .. } => emit_binary(*op, lhs, rhs),
        Term::If {
            condition,
            then,
            otherwise,
            ..
        } => format!(
            "({} ? {} : {})",
            emit(condition),
            emit(then),
            emit(otherwise)
        ),
        Term::Print { value, .. } => format!("print({})", emit(value)),
        // A block IIFE keeps let usable in expression position; a real
        // `let` statement keeps the name in scope for the bound value, so
        // let-bound functions can call themselves.
        Term::Let {
            name, value, next, ..
        } => format!(
            "(() => {{ let {} = {}; return {}; }})()",
            name.text,
            emit(value),
            emit(next)
        ),
        Term::Function(fun) => emit_function(fun),
        Term::Call {
            callee, arguments, ..
        } => {
            let args = arguments.iter().map(emit).collect::<Vec<_>>().join(", ");
            format!("{}({})", emit(callee), args)
        }
        Term::Var { text, .. } => text.clone(),
    }
}

fn emit_function(fun: &Function) -> String {
    let params = fun
        .parameters
        .iter()
        .map(|param| param.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("(({params}) => {})", emit(&fun.value))
}

fn emit_binary(op: BinaryOp, lhs: &Term, rhs: &Term) -> String {
    let l = emit(lhs);
    let r = emit(rhs);
    match op {
        BinaryOp::Add => format!("({l} + {r})"),
        BinaryOp::Sub => format!("({l} - {r})"),
        BinaryOp::Mul => format!("({l} * {r})"),
        // JS division is floating point; truncate to keep integers integral.
        BinaryOp::Div => format!("Math.trunc({l} / {r})"),
        BinaryOp::Rem => format!("({l} % {r})"),
        BinaryOp::Eq => format!("({l} === {r})"),
        BinaryOp::Neq => format!("({l} !== {r})"),
        BinaryOp::Lt => format!("({l} < {r})"),
        BinaryOp::Gt => format!("({l} > {r})"),
        BinaryOp::Lte => format!("({l} <= {r})"),
        BinaryOp::Gte => format!("({l} >= {r})"),
        BinaryOp::And => format!("and({l}, {r})"),
        BinaryOp::Or => format!("or({l}, {r})"),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
