use crate::evaluator;
use crate::types::{Arity, BadArgCount, BadArgType, MalInt, MalObject, PrimitiveFn};

const ARITHMETIC_ARITY: Arity = Arity::at_least(2);

// Every argument must be an integer; the error names the first one that isn't.
fn grab_ints(args: &[MalObject], name: &'static str) -> evaluator::Result<Vec<MalInt>> {
    args.iter()
        .enumerate()
        .map(|(i, obj)| {
            obj.as_int().map_err(|expected| {
                evaluator::Error::BadArgType(BadArgType {
                    name,
                    position: i + 1,
                    expected,
                    got: obj.type_name(),
                })
            })
        })
        .collect()
}

// The first operand and the rest. Arity has been checked by `call_primitive`;
// only a direct call through `fn_ptr` can arrive with no operands at all.
fn split_ints(
    args: &[MalObject],
    name: &'static str,
) -> evaluator::Result<(MalInt, Vec<MalInt>)> {
    let mut ints = grab_ints(args, name)?.into_iter();
    match ints.next() {
        Some(first) => Ok((first, ints.collect())),
        None => Err(evaluator::Error::BadArgCount(BadArgCount {
            name,
            expected: ARITHMETIC_ARITY,
            got: 0,
        })),
    }
}

fn fold_ints(
    args: &[MalObject],
    name: &'static str,
    op: fn(MalInt, MalInt) -> MalInt,
) -> evaluator::Result {
    let (first, rest) = split_ints(args, name)?;
    Ok(MalObject::Integer(rest.into_iter().fold(first, op)))
}

macro_rules! arithmetic_primitive {
    ($SYMBOL:tt, $NAME:ident, $op:ident) => {
        paste::item! {
            pub static $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[MalObject]| {
                    fold_ints(args, stringify!($SYMBOL), MalInt::[<wrapping_ $op>])
                },
                arity: ARITHMETIC_ARITY,
            };
        }
    };
}

arithmetic_primitive!(+, ADD, add);
arithmetic_primitive!(-, SUB, sub);
arithmetic_primitive!(*, MUL, mul);

pub static DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: ARITHMETIC_ARITY,
};

// Truncates toward zero, like the native integer division.
fn div_(args: &[MalObject]) -> evaluator::Result {
    let (first, rest) = split_ints(args, "/")?;
    rest.into_iter()
        .try_fold(first, |acc, x| match x {
            0 => Err(evaluator::Error::DivideByZero),
            x => Ok(acc.wrapping_div(x)),
        })
        .map(MalObject::Integer)
}

/// The built-ins bound by `environment::repl_env`, in registration order.
pub static CORE: &[&PrimitiveFn] = &[&ADD, &SUB, &MUL, &DIV];
