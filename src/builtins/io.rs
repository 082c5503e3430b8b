//! Input/output and evaluation primitives: print, load, eval-string, eval

use super::{args_exact, sset};
use crate::error::EvalResult;
use crate::eval::{eval, eval_body};
use crate::interp::Wisp;
use crate::object::Object;
use crate::reader::Reader;
use std::path::Path;

pub fn lisp_print(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "print")?;
    println!("{}", args[0].print(true));
    Ok(w.nil())
}

/// Read and evaluate a file; `load-file-error` if it cannot be opened.
pub fn lisp_load(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "load")?;
    let Some(path) = args[0].as_str() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    if w.load_file(Path::new(path)).is_err() {
        return Err(w.thrown("load-file-error", args[0].clone()));
    }
    Ok(w.t())
}

/// Parse one expression from a string and evaluate it.
pub fn lisp_eval_string(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "eval-string")?;
    let Some(src) = args[0].as_str() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    let mut reader = Reader::from_str(src, "eval-string");
    match reader.read_sexp(w) {
        Ok(Some(sexp)) => eval(w, &sexp),
        Ok(None) => Ok(w.nil()),
        Err(_) => Err(w.thrown("parse-error", args[0].clone())),
    }
}

pub fn register(w: &Wisp) {
    sset(w, "print", Object::cfunc(lisp_print));
    sset(w, "load", Object::cfunc(lisp_load));
    sset(w, "eval-string", Object::cfunc(lisp_eval_string));
    // (eval expr): the evaluated argument list is itself a body.
    sset(w, "eval", Object::cfunc(eval_body));
}
