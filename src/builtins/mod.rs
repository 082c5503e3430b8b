//! # Built-in Functions Module
//!
//! The primitive bindings installed into the symbol table at startup,
//! organized by category:
//!
//! - **[control]**: quote, lambda, defun, defmacro, if, progn, let, while,
//!   and, or — the special forms
//! - **[lists]**: cons, car, cdr, list, eq, eql, hash
//! - **[arithmetic]**: +, -, *, /, %, =, <, >, <=, >=
//! - **[predicates]**: not, nullp, funcp, listp, symbolp, numberp,
//!   integerp, floatp, stringp, vectorp
//! - **[symbols]**: set, value, symbol-name
//! - **[strings]**: concat2
//! - **[vectors]**: vset, vget, vlength, make-vector, vconcat
//! - **[io]**: print, load, eval-string, eval
//! - **[errors]**: throw, catch
//! - **[internals]**: refcount, eval-depth, max-eval-depth
//!
//! Each category registers its own bindings; `register_builtins` runs them
//! all in order.

use crate::error::Thrown;
use crate::interp::Wisp;
use crate::object::Object;

pub mod arithmetic;
pub mod control;
pub mod errors;
pub mod internals;
pub mod io;
pub mod lists;
pub mod predicates;
pub mod strings;
pub mod symbols;
pub mod vectors;

/// Register all built-in functions into the symbol table.
pub fn register_builtins(w: &Wisp) {
    arithmetic::register(w);
    control::register(w);
    lists::register(w);
    predicates::register(w);
    symbols::register(w);
    strings::register(w);
    vectors::register(w);
    io::register(w);
    errors::register(w);
    internals::register(w);
}

/// Bind a primitive, initializing the symbol's value stack.
pub(crate) fn sset(w: &Wisp, name: &str, val: Object) {
    if let Some(sym) = w.sym(name).as_symbol() {
        sym.set_top(val);
    }
}

/// Exactly `n` arguments, collected for indexed access.
pub(crate) fn args_exact(
    w: &Wisp,
    lst: &Object,
    n: usize,
    name: &str,
) -> Result<Vec<Object>, Thrown> {
    if lst.list_len() != n {
        return Err(w.thrown("wrong-number-of-arguments", w.sym(name)));
    }
    Ok(lst.iter().cloned().collect())
}

/// At least `n` arguments.
pub(crate) fn args_min(w: &Wisp, lst: &Object, n: usize, name: &str) -> Result<(), Thrown> {
    if lst.list_len() < n {
        return Err(w.thrown("wrong-number-of-arguments", w.sym(name)));
    }
    Ok(())
}

/// At most `n` arguments.
pub(crate) fn args_max(w: &Wisp, lst: &Object, n: usize, name: &str) -> Result<(), Thrown> {
    if lst.list_len() > n {
        return Err(w.thrown("wrong-number-of-arguments", w.sym(name)));
    }
    Ok(())
}
