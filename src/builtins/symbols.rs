//! Symbol-table access: set, value, symbol-name

use super::{args_exact, sset};
use crate::error::EvalResult;
use crate::interp::Wisp;
use crate::object::Object;

/// Rebind a symbol's current value. Constants refuse.
pub fn lisp_set(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "set")?;
    let Some(sym) = args[0].as_symbol() else {
        return Err(w.wrong_type(Object::cons(w.sym("set"), args[0].clone())));
    };
    if sym.is_constant() {
        return Err(w.thrown("setting-constant", args[0].clone()));
    }
    sym.set_top(args[1].clone());
    Ok(args[1].clone())
}

/// Read a symbol's current value.
pub fn lisp_value(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "value")?;
    if !args[0].is_symbol() {
        return Err(w.wrong_type(Object::cons(w.sym("value"), args[0].clone())));
    }
    w.get(&args[0])
}

pub fn symbol_name(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "symbol-name")?;
    let Some(sym) = args[0].as_symbol() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    Ok(Object::string(sym.name()))
}

pub fn register(w: &Wisp) {
    sset(w, "set", Object::cfunc(lisp_set));
    sset(w, "value", Object::cfunc(lisp_value));
    sset(w, "symbol-name", Object::cfunc(symbol_name));
}

#[cfg(test)]
mod tests {
    use crate::interp::Wisp;

    #[test]
    fn test_set_and_value() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(set 'x 42)").unwrap().print(true), "42");
        assert_eq!(w.eval_str("(value 'x)").unwrap().print(true), "42");
        assert_eq!(w.eval_str("x").unwrap().print(true), "42");
    }

    #[test]
    fn test_set_constant_refused() {
        let w = Wisp::new();
        let err = w.eval_str("(set 't 1)").unwrap_err();
        assert_eq!(err.tag.print(true), "setting-constant");
        let err = w.eval_str("(set 'nil 1)").unwrap_err();
        assert_eq!(err.tag.print(true), "setting-constant");
    }

    #[test]
    fn test_set_non_symbol() {
        let w = Wisp::new();
        let err = w.eval_str("(set 1 2)").unwrap_err();
        assert_eq!(err.tag.print(true), "wrong-type-argument");
    }

    #[test]
    fn test_value_unbound() {
        let w = Wisp::new();
        let err = w.eval_str("(value 'never-bound)").unwrap_err();
        assert_eq!(err.tag.print(true), "void-variable");
    }

    #[test]
    fn test_symbol_name() {
        let w = Wisp::new();
        assert_eq!(
            w.eval_str("(symbol-name 'foo)").unwrap().print(false),
            "foo"
        );
    }
}
