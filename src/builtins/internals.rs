//! Runtime introspection: refcount, eval-depth, max-eval-depth

use super::{args_exact, args_max, sset};
use crate::error::EvalResult;
use crate::interp::Wisp;
use crate::number::index_of;
use crate::object::Object;

/// The reference count of the argument. The exact value depends on how
/// many live handles the runtime holds; tests only rely on it moving.
pub fn lisp_refcount(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "refcount")?;
    Ok(Object::int(args[0].refcount() as i64))
}

pub fn lisp_eval_depth(w: &Wisp, lst: &Object) -> EvalResult {
    args_exact(w, lst, 0, "eval-depth")?;
    Ok(Object::int(w.eval_depth() as i64))
}

/// Read the recursion cap, or set it; values below 10 are refused.
pub fn lisp_max_eval_depth(w: &Wisp, lst: &Object) -> EvalResult {
    args_max(w, lst, 1, "max-eval-depth")?;
    if lst.is_nil() {
        return Ok(Object::int(w.max_eval_depth() as i64));
    }
    let arg = match lst.as_cons() {
        Some((a, _)) => a.clone(),
        None => return Ok(w.nil()),
    };
    if !arg.is_int() {
        return Err(w.wrong_type(arg));
    }
    match index_of(&arg) {
        Some(depth) if depth >= 10 => {
            w.set_max_eval_depth(depth as u32);
            Ok(arg)
        }
        _ => Ok(w.nil()),
    }
}

pub fn register(w: &Wisp) {
    sset(w, "refcount", Object::cfunc(lisp_refcount));
    sset(w, "eval-depth", Object::cfunc(lisp_eval_depth));
    sset(w, "max-eval-depth", Object::cfunc(lisp_max_eval_depth));
}
