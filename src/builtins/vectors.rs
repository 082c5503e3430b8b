//! Vector primitives: vset, vget, vlength, make-vector, vconcat
//!
//! All access is bounds-checked; an index outside the vector throws.

use super::{args_exact, sset};
use crate::error::{EvalResult, Thrown};
use crate::interp::Wisp;
use crate::number::index_of;
use crate::object::Object;

fn checked_index(w: &Wisp, vec: &Object, ind: &Object) -> Result<usize, Thrown> {
    if !ind.is_int() {
        return Err(w.wrong_type(ind.clone()));
    }
    let len = vec
        .as_vector()
        .map(|v| v.borrow().len())
        .unwrap_or_default();
    match index_of(ind) {
        Some(i) if i < len => Ok(i),
        _ => Err(w.wrong_type(ind.clone())),
    }
}

pub fn lisp_vset(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 3, "vset")?;
    let Some(vec) = args[0].as_vector() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    let i = checked_index(w, &args[0], &args[1])?;
    vec.borrow_mut()[i] = args[2].clone();
    Ok(args[2].clone())
}

pub fn lisp_vget(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "vget")?;
    let Some(vec) = args[0].as_vector() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    let i = checked_index(w, &args[0], &args[1])?;
    let v = vec.borrow();
    Ok(v[i].clone())
}

pub fn lisp_vlength(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "vlength")?;
    let Some(vec) = args[0].as_vector() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    let len = vec.borrow().len();
    Ok(Object::int(len as i64))
}

/// `(make-vector n fill)`: every slot starts as the same object.
pub fn make_vector(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "make-vector")?;
    if !args[0].is_int() {
        return Err(w.wrong_type(args[0].clone()));
    }
    let Some(n) = index_of(&args[0]) else {
        return Err(w.wrong_type(args[0].clone()));
    };
    Ok(Object::vector(vec![args[1].clone(); n]))
}

pub fn lisp_vconcat(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "vconcat")?;
    let Some(a) = args[0].as_vector() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    let Some(b) = args[1].as_vector() else {
        return Err(w.wrong_type(args[1].clone()));
    };
    let mut items = a.borrow().clone();
    items.extend(b.borrow().iter().cloned());
    Ok(Object::vector(items))
}

pub fn register(w: &Wisp) {
    sset(w, "vset", Object::cfunc(lisp_vset));
    sset(w, "vget", Object::cfunc(lisp_vget));
    sset(w, "vlength", Object::cfunc(lisp_vlength));
    sset(w, "make-vector", Object::cfunc(make_vector));
    sset(w, "vconcat", Object::cfunc(lisp_vconcat));
}
