use crate::environment::{Environment, SymbolResolution, UnknownSymbol};
use crate::types::{BadArgCount, BadArgType, MalMap, MalObject, MalSymbol, PrimitiveFn};
use itertools::Itertools;
use std::fmt;

pub type Result<T = MalObject> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // Apply errors: the form is well read but can't be called as written.
    NotAList(MalObject),
    NotCallable(MalObject),
    BadArgCount(BadArgCount),
    BadArgType(BadArgType),
    // Evaluation faults with an explicit policy.
    UnknownSymbol(UnknownSymbol),
    DivideByZero,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotAList(obj) => write!(f, "cannot apply {}: not a list", obj),
            Error::NotCallable(obj) => write!(
                f,
                "cannot apply list whose first entry is not callable: {} is a {}",
                obj,
                obj.type_name()
            ),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::BadArgType(e) => write!(f, "type mismatch: {}", e),
            Error::UnknownSymbol(e) => write!(f, "{}", e),
            Error::DivideByZero => write!(f, "cannot divide by zero!"),
        }
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

impl From<UnknownSymbol> for Error {
    fn from(e: UnknownSymbol) -> Self {
        Self::UnknownSymbol(e)
    }
}

/// Evaluate `ast` in `env`.
///
/// A non-empty list has all of its elements evaluated, left to right, and is
/// then applied: its first element must be callable. Every other form is
/// handed to [`evaluate_ast`].
pub fn eval(ast: &MalObject, env: &Environment) -> Result {
    log::trace!("eval {}", ast);
    let result = match ast {
        MalObject::List(list) if !list.is_empty() => {
            let evaluated = evaluate_sequence_elementwise(list, env)?;
            apply(&MalObject::wrap_list(evaluated))
        }
        _ => evaluate_ast(ast, env),
    };
    match &result {
        Ok(value) => log::trace!("eval {} produced {}", ast, value),
        Err(e) => log::debug!("eval {} failed: {}", ast, e),
    }
    result
}

/// Evaluate a form without applying it.
///
/// Symbols are looked up, vectors and hashmaps are evaluated element by
/// element, and everything else (the empty list included) evaluates to itself.
pub fn evaluate_ast(ast: &MalObject, env: &Environment) -> Result {
    use MalObject::*;
    match ast {
        Symbol(s) => resolve_symbol(s, env),
        List(list) => evaluate_sequence_elementwise(list, env).map(MalObject::wrap_list),
        Vector(vec) => evaluate_sequence_elementwise(vec, env).map(MalObject::wrap_vector),
        Map(map) => evaluate_map(map, env),
        Integer(_) | String(_) | Keyword(_) | Primitive(_) => Ok(ast.clone()),
    }
}

fn resolve_symbol(symbol: &MalSymbol, env: &Environment) -> Result {
    match env.fetch(symbol) {
        Ok(value) => Ok(value),
        Err(unknown) => match env.resolution() {
            SymbolResolution::Permissive => {
                log::debug!("{} is unbound, evaluating to itself", symbol);
                Ok(MalObject::Symbol(symbol.clone()))
            }
            SymbolResolution::Strict => Err(Error::from(unknown)),
        },
    }
}

// Keys sit at even positions and pass through untouched; values are evaluated.
fn evaluate_map(map: &MalMap, env: &Environment) -> Result {
    let entries: Result<Vec<MalObject>> = map
        .iter()
        .enumerate()
        .map(|(i, entry)| match i % 2 {
            0 => Ok(entry.clone()),
            _ => eval(entry, env),
        })
        .collect();
    entries.map(MalObject::wrap_map)
}

pub fn evaluate_sequence_elementwise(
    seq: &[MalObject],
    env: &Environment,
) -> Result<Vec<MalObject>> {
    seq.iter().map(|obj| eval(obj, env)).collect()
}

/// Apply an evaluated list: call its first element with the rest as arguments.
pub fn apply(form: &MalObject) -> Result {
    let elements = form
        .as_list()
        .map_err(|_| Error::NotAList(form.clone()))?;
    match elements.split_first() {
        Some((MalObject::Primitive(func), args)) => call_primitive(func, args),
        Some((head, _)) => Err(Error::NotCallable(head.clone())),
        None => Err(Error::NotCallable(form.clone())),
    }
}

pub(crate) fn pretty_print_args(args: &[MalObject]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[MalObject]) -> Result {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core;
    use crate::environment::{repl_env, repl_env_with};
    use crate::reader::read_str;

    fn rep(input: &str) -> Result {
        let env = repl_env();
        eval(&read_str(input).unwrap(), &env)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(rep("(+ 2 3)").unwrap(), MalObject::Integer(5));
        assert_eq!(rep("(* (- 9 4) 2)").unwrap(), MalObject::Integer(10));
        assert_eq!(rep("(/ 7 2)").unwrap(), MalObject::Integer(3));
        assert_eq!(rep("(- (+ 5 (* 2 3)) 3)").unwrap(), MalObject::Integer(8));
    }

    #[test]
    fn arity_one_is_insufficient() {
        match rep("(+ 1)") {
            Err(Error::BadArgCount(e)) => {
                assert_eq!(e.name, "+");
                assert_eq!(e.got, 1);
                assert!(e.to_string().starts_with("insufficient arguments"));
            }
            other => panic!("expected BadArgCount, got {:?}", other),
        }
    }

    #[test]
    fn divide_by_zero_is_an_error() {
        assert!(matches!(rep("(/ 5 0)"), Err(Error::DivideByZero)));
    }

    #[test]
    fn empty_list_evaluates_to_itself() {
        assert_eq!(rep("()").unwrap(), MalObject::new_list());
        assert_eq!(
            eval(&MalObject::new_list(), &Environment::new()).unwrap(),
            MalObject::new_list()
        );
    }

    #[test]
    fn vector_is_never_applied() {
        let env = repl_env();
        let plus = env.get(&"+".into()).unwrap().clone();
        assert_eq!(
            eval(&read_str("[+ 1 2]").unwrap(), &env).unwrap(),
            MalObject::wrap_vector(vec![plus, MalObject::Integer(1), MalObject::Integer(2)])
        );
        assert_eq!(rep("(+ 1 2)").unwrap(), MalObject::Integer(3));
        assert_eq!(
            rep("[1 (+ 1 1) []]").unwrap(),
            MalObject::wrap_vector(vec![
                MalObject::Integer(1),
                MalObject::Integer(2),
                MalObject::wrap_vector(vec![]),
            ])
        );
    }

    #[test]
    fn hashmap_evaluates_odd_positions_only() {
        let env = repl_env();
        assert_eq!(
            eval(&read_str("{a (+ 1 2) + (* 2 2)}").unwrap(), &env).unwrap(),
            MalObject::wrap_map(vec![
                MalObject::new_symbol("a"),
                MalObject::Integer(3),
                MalObject::new_symbol("+"),
                MalObject::Integer(4),
            ])
        );
        // Keys are never looked up, even under strict resolution.
        let strict = repl_env_with(SymbolResolution::Strict);
        assert_eq!(
            eval(&read_str("{unbound 1}").unwrap(), &strict).unwrap(),
            MalObject::wrap_map(vec![MalObject::new_symbol("unbound"), MalObject::Integer(1)])
        );
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        for input in &["7", "\"text\"", ":kw"] {
            let form = read_str(input).unwrap();
            assert_eq!(rep(input).unwrap(), form);
        }
        let plus = MalObject::Primitive(&core::ADD);
        assert_eq!(eval(&plus, &Environment::new()).unwrap(), plus);
    }

    #[test]
    fn unbound_symbol_is_permissive_by_default() {
        assert_eq!(rep("undefined").unwrap(), MalObject::new_symbol("undefined"));
        assert_eq!(
            rep("[x 1]").unwrap(),
            MalObject::wrap_vector(vec![MalObject::new_symbol("x"), MalObject::Integer(1)])
        );
    }

    #[test]
    fn unbound_symbol_fails_when_strict() {
        let env = repl_env_with(SymbolResolution::Strict);
        match eval(&read_str("(+ 1 undefined)").unwrap(), &env) {
            Err(Error::UnknownSymbol(UnknownSymbol(s))) => assert_eq!(s.as_str(), "undefined"),
            other => panic!("expected UnknownSymbol, got {:?}", other),
        }
    }

    #[test]
    fn permissive_unbound_head_is_not_callable() {
        match rep("(foo 1 2)") {
            Err(Error::NotCallable(head)) => assert_eq!(head, MalObject::new_symbol("foo")),
            other => panic!("expected NotCallable, got {:?}", other),
        }
        assert!(matches!(rep("(1 2)"), Err(Error::NotCallable(_))));
        assert!(matches!(rep("('a)"), Err(Error::NotCallable(_))));
    }

    #[test]
    fn non_integer_operand() {
        match rep("(+ 1 \"2\")") {
            Err(Error::BadArgType(e)) => assert_eq!(e.position, 2),
            other => panic!("expected BadArgType, got {:?}", other),
        }
        match rep("(* :a 2)") {
            Err(Error::BadArgType(e)) => {
                assert_eq!(e.position, 1);
                assert_eq!(e.got, "keyword");
            }
            other => panic!("expected BadArgType, got {:?}", other),
        }
    }

    #[test]
    fn errors_abort_the_whole_form() {
        assert!(matches!(rep("[1 (/ 1 0) 3]"), Err(Error::DivideByZero)));
        assert!(matches!(rep("{:a (+ 1)}"), Err(Error::BadArgCount(_))));
    }

    #[test]
    fn apply_requires_a_list() {
        let vector = MalObject::wrap_vector(vec![MalObject::Primitive(&core::ADD)]);
        assert!(matches!(apply(&vector), Err(Error::NotAList(_))));
        assert!(matches!(
            apply(&MalObject::new_list()),
            Err(Error::NotCallable(_))
        ));
        let form = MalObject::wrap_list(vec![
            MalObject::Primitive(&core::MUL),
            MalObject::Integer(6),
            MalObject::Integer(7),
        ]);
        assert_eq!(apply(&form).unwrap(), MalObject::Integer(42));
    }

    #[test]
    fn evaluation_does_not_touch_the_input() {
        let env = repl_env();
        let form = read_str("[(+ 1 2) x]").unwrap();
        let before = form.clone();
        eval(&form, &env).unwrap();
        assert_eq!(form, before);
    }

    #[test]
    fn rebound_names_are_used() {
        let mut env = repl_env();
        env.set("x", MalObject::Integer(40));
        env.set("plus", MalObject::Primitive(&core::ADD));
        assert_eq!(
            eval(&read_str("(plus x 2)").unwrap(), &env).unwrap(),
            MalObject::Integer(42)
        );
    }
}
