//! Type predicates: not, nullp, funcp, listp, symbolp, numberp, integerp,
//! floatp, stringp, vectorp
//!
//! All take one argument and return T or NIL.

use super::{args_exact, sset};
use crate::error::EvalResult;
use crate::interp::Wisp;
use crate::object::Object;

pub fn nullp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "nullp")?;
    Ok(w.bool(args[0].is_nil()))
}

pub fn funcp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "funcp")?;
    Ok(w.bool(args[0].is_func()))
}

pub fn listp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "listp")?;
    Ok(w.bool(args[0].is_list()))
}

pub fn symbolp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "symbolp")?;
    Ok(w.bool(args[0].is_symbol()))
}

pub fn numberp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "numberp")?;
    Ok(w.bool(args[0].is_number()))
}

pub fn integerp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "integerp")?;
    Ok(w.bool(args[0].is_int()))
}

pub fn floatp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "floatp")?;
    Ok(w.bool(args[0].is_float()))
}

pub fn stringp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "stringp")?;
    Ok(w.bool(args[0].is_string()))
}

pub fn vectorp(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "vectorp")?;
    Ok(w.bool(args[0].is_vector()))
}

pub fn register(w: &Wisp) {
    // `not` is NIL-testing, the same primitive as nullp.
    sset(w, "not", Object::cfunc(nullp));
    sset(w, "nullp", Object::cfunc(nullp));
    sset(w, "funcp", Object::cfunc(funcp));
    sset(w, "listp", Object::cfunc(listp));
    sset(w, "symbolp", Object::cfunc(symbolp));
    sset(w, "numberp", Object::cfunc(numberp));
    sset(w, "integerp", Object::cfunc(integerp));
    sset(w, "floatp", Object::cfunc(floatp));
    sset(w, "stringp", Object::cfunc(stringp));
    sset(w, "vectorp", Object::cfunc(vectorp));
}
