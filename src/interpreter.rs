use crate::environment::Environment;
use crate::printer::PrintMode;
use crate::{evaluator, printer, reader, MalObject};
use std::fmt;

pub type Result<T = MalObject> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Eval(e) => write!(f, "eval error: {}", e),
        }
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

impl From<evaluator::Error> for Error {
    fn from(e: evaluator::Error) -> Self {
        Self::Eval(e)
    }
}

#[allow(non_snake_case)]
pub fn READ(line: &str) -> Result {
    reader::read_str(line).map_err(Error::Read)
}

#[allow(non_snake_case)]
pub fn EVAL(ast: &MalObject, env: &Environment) -> Result {
    evaluator::eval(ast, env).map_err(Error::Eval)
}

#[allow(non_snake_case)]
pub fn PRINT(obj: &MalObject) -> String {
    printer::pr_str(obj, PrintMode::ReadableRepresentation)
}

pub fn read_print(line: &str) -> Result<String> {
    READ(line).map(|ast| PRINT(&ast))
}

pub fn rep(line: &str, env: &Environment) -> Result<String> {
    let ast = READ(line)?;
    let value = EVAL(&ast, env)?;
    Ok(PRINT(&value))
}
