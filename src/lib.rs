use std::io;

use crate::ast::File;
use crate::eval::{Scope, Value};

pub mod ast;
pub mod eval;
pub mod js;

/// Decodes a program from its JSON syntax tree.
pub fn load(source: &str) -> Result<File, Error> {
    Ok(serde_json::from_str(source)?)
}

/// Evaluates a program under a fresh scope, printing to stdout.
pub fn interpret(file: &File) -> Result<Value<'_>, Error> {
    let scope = Scope::new();
    let mut out = io::stdout().lock();
    Ok(eval::eval(&file.expression, &scope, &mut out)?)
}

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum Error {
    #[error("error decoding program")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] eval::Error),
}
