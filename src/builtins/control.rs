//! Special forms: quote, lambda, defun, defmacro, if, progn, let, while,
//! and, or
//!
//! All of these receive their arguments unevaluated.

use super::{args_exact, args_min, sset};
use crate::error::EvalResult;
use crate::eval::{eval, eval_body};
use crate::interp::Wisp;
use crate::object::Object;

/// Validate `(formals body…)`: a proper list of symbols followed by a
/// proper body list.
pub fn is_func_form(form: &Object) -> bool {
    let Some((formals, body)) = form.as_cons() else {
        return false;
    };
    if !formals.is_list() {
        return false;
    }
    let mut it = formals.iter();
    for v in it.by_ref() {
        if !v.is_symbol() {
            return false;
        }
    }
    if !it.remainder().is_nil() {
        return false;
    }
    body.is_proper_list()
}

/// Returns its argument unevaluated.
pub fn lisp_quote(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "quote")?;
    Ok(args[0].clone())
}

/// `(lambda (formals…) body…)` closes over nothing; it simply tags the
/// form so `apply` recognizes it.
pub fn lambda_f(w: &Wisp, lst: &Object) -> EvalResult {
    if !is_func_form(lst) {
        return Err(w.thrown("bad-function-form", lst.clone()));
    }
    Ok(Object::cons(w.lambda_sym().clone(), lst.clone()))
}

/// `(defun name (formals…) body…)` binds name at top level.
pub fn defun(w: &Wisp, lst: &Object) -> EvalResult {
    let (name, func_form) = match lst.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => return Err(w.thrown("bad-function-form", lst.clone())),
    };
    let Some(sym) = name.as_symbol() else {
        return Err(w.thrown("bad-function-form", lst.clone()));
    };
    if !is_func_form(&func_form) {
        return Err(w.thrown("bad-function-form", lst.clone()));
    }
    sym.set_top(Object::cons(w.lambda_sym().clone(), func_form));
    Ok(name)
}

/// `(defmacro name (formals…) body…)`; the body produces a form evaluated
/// at the call site.
pub fn defmacro(w: &Wisp, lst: &Object) -> EvalResult {
    let (name, func_form) = match lst.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => return Err(w.thrown("bad-function-form", lst.clone())),
    };
    let Some(sym) = name.as_symbol() else {
        return Err(w.thrown("bad-function-form", lst.clone()));
    };
    if !is_func_form(&func_form) {
        return Err(w.thrown("bad-function-form", lst.clone()));
    }
    let f = Object::cons(w.macro_sym().clone(), func_form);
    sym.set_top(f.clone());
    Ok(f)
}

/// `(if cond then else…)`: the else branch is an implicit progn.
pub fn lisp_if(w: &Wisp, lst: &Object) -> EvalResult {
    args_min(w, lst, 2, "if")?;
    let (cond, rest) = match lst.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => return Ok(w.nil()),
    };
    let r = eval(w, &cond)?;
    let (then, els) = match rest.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => return Ok(w.nil()),
    };
    if r.truthy() {
        eval(w, &then)
    } else {
        eval_body(w, &els)
    }
}

pub fn progn(w: &Wisp, lst: &Object) -> EvalResult {
    eval_body(w, lst)
}

/// `(let ((sym expr)…) body…)`: initializers evaluate sequentially; every
/// binding pushed so far is popped again if one of them throws.
pub fn lisp_let(w: &Wisp, lst: &Object) -> EvalResult {
    let (vlist, body) = match lst.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => (w.nil(), w.nil()),
    };
    if !vlist.is_list() {
        return Err(w.thrown("bad-let-form", lst.clone()));
    }

    // Verify structure before touching any value stack.
    let mut it = vlist.iter();
    for pair in it.by_ref() {
        let ok = matches!(pair.as_cons(), Some((sym, _)) if sym.is_symbol());
        if !ok {
            return Err(w.thrown("bad-let-form", lst.clone()));
        }
    }
    if !it.remainder().is_nil() {
        return Err(w.thrown("bad-let-form", lst.clone()));
    }

    let mut bound: Vec<Object> = Vec::new();
    for pair in vlist.iter() {
        let (name, rest) = match pair.as_cons() {
            Some((a, b)) => (a.clone(), b.clone()),
            None => continue,
        };
        let expr = match rest.as_cons() {
            Some((e, _)) => e.clone(),
            None => w.nil(),
        };
        match eval(w, &expr) {
            Ok(v) => {
                if let Some(sym) = name.as_symbol() {
                    sym.push(v);
                    bound.push(name.clone());
                }
            }
            Err(t) => {
                // Undo scoping.
                for name in bound.iter().rev() {
                    if let Some(sym) = name.as_symbol() {
                        sym.pop();
                    }
                }
                return Err(t);
            }
        }
    }

    let result = eval_body(w, &body);
    for name in bound.iter().rev() {
        if let Some(sym) = name.as_symbol() {
            sym.pop();
        }
    }
    result
}

/// `(while cond body…)`: returns the last body result, NIL if the body
/// never ran.
pub fn lisp_while(w: &Wisp, lst: &Object) -> EvalResult {
    args_min(w, lst, 1, "while")?;
    let (cond, body) = match lst.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => return Ok(w.nil()),
    };
    let mut r = w.nil();
    loop {
        let c = eval(w, &cond)?;
        if c.is_nil() {
            return Ok(r);
        }
        r = eval_body(w, &body)?;
    }
}

/// Short-circuit conjunction: last truthy value, or NIL at the first NIL.
pub fn lisp_and(w: &Wisp, lst: &Object) -> EvalResult {
    let mut r = w.t();
    let mut p = lst.clone();
    loop {
        let (car, cdr) = match p.as_cons() {
            Some((a, b)) => (a.clone(), b.clone()),
            None => break,
        };
        r = eval(w, &car)?;
        if r.is_nil() {
            return Ok(w.nil());
        }
        p = cdr;
    }
    if !p.is_nil() {
        return Err(w.thrown("improper-list", lst.clone()));
    }
    Ok(r)
}

/// Short-circuit disjunction: first truthy value, or NIL.
pub fn lisp_or(w: &Wisp, lst: &Object) -> EvalResult {
    let mut p = lst.clone();
    loop {
        let (car, cdr) = match p.as_cons() {
            Some((a, b)) => (a.clone(), b.clone()),
            None => break,
        };
        let r = eval(w, &car)?;
        if r.truthy() {
            return Ok(r);
        }
        p = cdr;
    }
    if !p.is_nil() {
        return Err(w.thrown("improper-list", lst.clone()));
    }
    Ok(w.nil())
}

pub fn register(w: &Wisp) {
    sset(w, "quote", Object::special(lisp_quote));
    sset(w, "lambda", Object::special(lambda_f));
    sset(w, "defun", Object::special(defun));
    sset(w, "defmacro", Object::special(defmacro));
    sset(w, "if", Object::special(lisp_if));
    sset(w, "progn", Object::special(progn));
    sset(w, "let", Object::special(lisp_let));
    sset(w, "while", Object::special(lisp_while));
    sset(w, "and", Object::special(lisp_and));
    sset(w, "or", Object::special(lisp_or));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("'x").unwrap().print(true), "x");
        assert_eq!(w.eval_str("'(1 2)").unwrap().print(true), "(1 2)");
    }

    #[test]
    fn test_if_branches() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(if t 1 2)").unwrap().print(true), "1");
        assert_eq!(w.eval_str("(if nil 1 2)").unwrap().print(true), "2");
        // The else branch is an implicit progn.
        assert_eq!(w.eval_str("(if nil 1 2 3 4)").unwrap().print(true), "4");
        assert!(w.eval_str("(if t 1)").unwrap().print(true) == "1");
        assert!(w.eval_str("(if nil 1)").unwrap().is_nil());
    }

    #[test]
    fn test_progn() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(progn 1 2 3)").unwrap().print(true), "3");
        assert!(w.eval_str("(progn)").unwrap().is_nil());
    }

    #[test]
    fn test_let_binds_and_unbinds() {
        let w = Wisp::new();
        assert_eq!(
            w.eval_str("(let ((x 1) (y 2)) (+ x y))").unwrap().print(true),
            "3"
        );
        // Bindings are gone afterwards.
        let err = w.eval_str("(value 'x)").unwrap_err();
        assert_eq!(err.tag.print(true), "void-variable");
    }

    #[test]
    fn test_let_sequential() {
        let w = Wisp::new();
        w.eval_str("(set 'x 10)").unwrap();
        // The second initializer sees the first binding.
        assert_eq!(
            w.eval_str("(let ((x 1) (y x)) y)").unwrap().print(true),
            "1"
        );
    }

    #[test]
    fn test_let_rolls_back_on_failed_initializer() {
        let w = Wisp::new();
        let err = w
            .eval_str("(let ((a 1) (b (throw 'boom 0))) a)")
            .unwrap_err();
        assert_eq!(err.tag.print(true), "boom");
        assert_eq!(w.sym("a").as_symbol().unwrap().depth(), 0);
        assert_eq!(w.sym("b").as_symbol().unwrap().depth(), 0);
    }

    #[test]
    fn test_bad_let_form() {
        let w = Wisp::new();
        let err = w.eval_str("(let (7) 1)").unwrap_err();
        assert_eq!(err.tag.print(true), "bad-let-form");
        let err = w.eval_str("(let ((1 2)) 1)").unwrap_err();
        assert_eq!(err.tag.print(true), "bad-let-form");
    }

    #[test]
    fn test_while_loops() {
        let w = Wisp::new();
        w.eval_str("(set 'n 0)").unwrap();
        let r = w
            .eval_str("(while (< n 5) (set 'n (+ n 1)))")
            .unwrap();
        assert_eq!(r.print(true), "5");
        assert_eq!(w.eval_str("(value 'n)").unwrap().print(true), "5");
        // Condition false on entry: NIL.
        assert!(w.eval_str("(while nil 1)").unwrap().is_nil());
    }

    #[test]
    fn test_and_or_short_circuit() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(and 1 2 3)").unwrap().print(true), "3");
        assert!(w.eval_str("(and 1 nil (throw 'no 0))").unwrap().is_nil());
        assert_eq!(w.eval_str("(or nil 2 (throw 'no 0))").unwrap().print(true), "2");
        assert!(w.eval_str("(or nil nil)").unwrap().is_nil());
        assert!(w.eval_str("(and)").unwrap().print(true) == "t");
        assert!(w.eval_str("(or)").unwrap().is_nil());
    }

    #[test]
    fn test_defun_and_call() {
        let w = Wisp::new();
        let name = w.eval_str("(defun add1 (x) (+ x 1))").unwrap();
        assert_eq!(name.print(true), "add1");
        assert_eq!(w.eval_str("(add1 41)").unwrap().print(true), "42");
    }

    #[test]
    fn test_bad_function_form() {
        let w = Wisp::new();
        let err = w.eval_str("(lambda 7 1)").unwrap_err();
        assert_eq!(err.tag.print(true), "bad-function-form");
        let err = w.eval_str("(defun f 7 1)").unwrap_err();
        assert_eq!(err.tag.print(true), "bad-function-form");
    }

    #[test]
    fn test_lambda_direct_application() {
        let w = Wisp::new();
        assert_eq!(
            w.eval_str("((lambda (x y) (* x y)) 3 4)").unwrap().print(true),
            "12"
        );
    }
}
