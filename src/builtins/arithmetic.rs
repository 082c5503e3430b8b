//! Math primitives: +, -, *, /, %, =, <, >, <=, >=
//!
//! INT stays arbitrary-precision as long as every operand is an INT; any
//! FLOAT operand promotes the whole computation to FLOAT.

use super::{args_exact, args_min, sset};
use crate::error::{EvalResult, Thrown};
use crate::interp::Wisp;
use crate::number::{coerce, int_to_f64, num_cmp, Num};
use crate::object::Object;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::cmp::Ordering;

/// Running value of a numeric fold.
enum Acc {
    Int(BigInt),
    Float(f64),
}

impl Acc {
    fn obj(self) -> Object {
        match self {
            Acc::Int(n) => Object::bigint(n),
            Acc::Float(f) => Object::float(f),
        }
    }

    fn of(o: &Object, w: &Wisp) -> Result<Acc, Thrown> {
        match coerce(o) {
            Some(Num::Int(n)) => Ok(Acc::Int(n.clone())),
            Some(Num::Float(f)) => Ok(Acc::Float(f)),
            None => Err(w.wrong_type(o.clone())),
        }
    }
}

fn num_arg<'a>(w: &Wisp, o: &'a Object) -> Result<Num<'a>, Thrown> {
    coerce(o).ok_or_else(|| w.wrong_type(o.clone()))
}

pub fn lisp_add(w: &Wisp, lst: &Object) -> EvalResult {
    let mut acc = Acc::Int(BigInt::zero());
    for o in lst.iter() {
        acc = match (acc, num_arg(w, o)?) {
            (Acc::Int(a), Num::Int(b)) => Acc::Int(a + b),
            (Acc::Int(a), Num::Float(b)) => Acc::Float(int_to_f64(&a) + b),
            (Acc::Float(a), Num::Int(b)) => Acc::Float(a + int_to_f64(b)),
            (Acc::Float(a), Num::Float(b)) => Acc::Float(a + b),
        };
    }
    Ok(acc.obj())
}

/// With one argument, negation; otherwise subtract the rest from the first.
pub fn lisp_sub(w: &Wisp, lst: &Object) -> EvalResult {
    args_min(w, lst, 1, "-")?;
    let mut it = lst.iter();
    let first = it.next().expect("checked arity");
    let mut acc = Acc::of(first, w)?;
    let mut any = false;
    for o in it {
        any = true;
        acc = match (acc, num_arg(w, o)?) {
            (Acc::Int(a), Num::Int(b)) => Acc::Int(a - b),
            (Acc::Int(a), Num::Float(b)) => Acc::Float(int_to_f64(&a) - b),
            (Acc::Float(a), Num::Int(b)) => Acc::Float(a - int_to_f64(b)),
            (Acc::Float(a), Num::Float(b)) => Acc::Float(a - b),
        };
    }
    if !any {
        acc = match acc {
            Acc::Int(a) => Acc::Int(-a),
            Acc::Float(a) => Acc::Float(-a),
        };
    }
    Ok(acc.obj())
}

pub fn lisp_mul(w: &Wisp, lst: &Object) -> EvalResult {
    let mut acc = Acc::Int(BigInt::one());
    for o in lst.iter() {
        acc = match (acc, num_arg(w, o)?) {
            (Acc::Int(a), Num::Int(b)) => Acc::Int(a * b),
            (Acc::Int(a), Num::Float(b)) => Acc::Float(int_to_f64(&a) * b),
            (Acc::Float(a), Num::Int(b)) => Acc::Float(a * int_to_f64(b)),
            (Acc::Float(a), Num::Float(b)) => Acc::Float(a * b),
        };
    }
    Ok(acc.obj())
}

fn check_divisor(w: &Wisp, o: &Object) -> Result<(), Thrown> {
    let zero = match coerce(o) {
        Some(Num::Int(n)) => n.is_zero(),
        Some(Num::Float(f)) => f == 0.0,
        None => false,
    };
    if zero {
        return Err(w.thrown("divide-by-zero", o.clone()));
    }
    Ok(())
}

/// Integer division truncates; with one argument, the reciprocal.
pub fn lisp_div(w: &Wisp, lst: &Object) -> EvalResult {
    args_min(w, lst, 1, "/")?;
    let mut it = lst.iter();
    let first = it.next().expect("checked arity");
    let mut acc = Acc::of(first, w)?;
    let mut any = false;
    for o in it {
        any = true;
        check_divisor(w, o)?;
        acc = match (acc, num_arg(w, o)?) {
            (Acc::Int(a), Num::Int(b)) => Acc::Int(a / b),
            (Acc::Int(a), Num::Float(b)) => Acc::Float(int_to_f64(&a) / b),
            (Acc::Float(a), Num::Int(b)) => Acc::Float(a / int_to_f64(b)),
            (Acc::Float(a), Num::Float(b)) => Acc::Float(a / b),
        };
    }
    if !any {
        check_divisor(w, first)?;
        acc = match acc {
            Acc::Int(a) => Acc::Int(BigInt::one() / a),
            Acc::Float(a) => Acc::Float(1.0 / a),
        };
    }
    Ok(acc.obj())
}

/// Remainder, sign of the dividend.
pub fn lisp_mod(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "%")?;
    check_divisor(w, &args[1])?;
    let r = match (num_arg(w, &args[0])?, num_arg(w, &args[1])?) {
        (Num::Int(a), Num::Int(b)) => Acc::Int(a % b),
        (Num::Int(a), Num::Float(b)) => Acc::Float(int_to_f64(a) % b),
        (Num::Float(a), Num::Int(b)) => Acc::Float(a % int_to_f64(b)),
        (Num::Float(a), Num::Float(b)) => Acc::Float(a % b),
    };
    Ok(r.obj())
}

fn compare(w: &Wisp, lst: &Object, name: &str, pred: fn(Ordering) -> bool) -> EvalResult {
    let args = args_exact(w, lst, 2, name)?;
    num_arg(w, &args[0])?;
    num_arg(w, &args[1])?;
    match num_cmp(&args[0], &args[1]) {
        Some(ord) => Ok(w.bool(pred(ord))),
        None => Ok(w.nil()),
    }
}

pub fn num_eq(w: &Wisp, lst: &Object) -> EvalResult {
    compare(w, lst, "=", |o| o == Ordering::Equal)
}

pub fn num_lt(w: &Wisp, lst: &Object) -> EvalResult {
    compare(w, lst, "<", |o| o == Ordering::Less)
}

pub fn num_gt(w: &Wisp, lst: &Object) -> EvalResult {
    compare(w, lst, ">", |o| o == Ordering::Greater)
}

pub fn num_le(w: &Wisp, lst: &Object) -> EvalResult {
    compare(w, lst, "<=", |o| o != Ordering::Greater)
}

pub fn num_ge(w: &Wisp, lst: &Object) -> EvalResult {
    compare(w, lst, ">=", |o| o != Ordering::Less)
}

pub fn register(w: &Wisp) {
    sset(w, "+", Object::cfunc(lisp_add));
    sset(w, "-", Object::cfunc(lisp_sub));
    sset(w, "*", Object::cfunc(lisp_mul));
    sset(w, "/", Object::cfunc(lisp_div));
    sset(w, "%", Object::cfunc(lisp_mod));
    sset(w, "=", Object::cfunc(num_eq));
    sset(w, "<", Object::cfunc(num_lt));
    sset(w, ">", Object::cfunc(num_gt));
    sset(w, "<=", Object::cfunc(num_le));
    sset(w, ">=", Object::cfunc(num_ge));
}
