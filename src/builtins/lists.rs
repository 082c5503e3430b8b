//! Pair constructors, accessors, and equality: cons, car, cdr, list, eq,
//! eql, hash

use super::{args_exact, sset};
use crate::error::EvalResult;
use crate::interp::Wisp;
use crate::number::num_eq_strict;
use crate::object::{ObjData, Object};
use num_bigint::BigInt;

pub fn lisp_cons(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "cons")?;
    Ok(Object::cons(args[0].clone(), args[1].clone()))
}

pub fn lisp_car(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "car")?;
    if args[0].is_nil() {
        return Ok(w.nil());
    }
    match args[0].as_cons() {
        Some((car, _)) => Ok(car.clone()),
        None => Err(w.wrong_type(args[0].clone())),
    }
}

pub fn lisp_cdr(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "cdr")?;
    if args[0].is_nil() {
        return Ok(w.nil());
    }
    match args[0].as_cons() {
        Some((_, cdr)) => Ok(cdr.clone()),
        None => Err(w.wrong_type(args[0].clone())),
    }
}

/// The evaluated arguments already are a fresh list.
pub fn lisp_list(_w: &Wisp, lst: &Object) -> EvalResult {
    Ok(lst.clone())
}

/// Object identity.
pub fn eq(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "eq")?;
    Ok(w.bool(Object::eq(&args[0], &args[1])))
}

/// Structural equality for atoms; identity for symbols and conses; NIL for
/// vectors, always. Mixed INT/FLOAT is never eql.
pub fn eql(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "eql")?;
    let (a, b) = (&args[0], &args[1]);
    let r = match (a.data(), b.data()) {
        (ObjData::Int(_), ObjData::Int(_)) | (ObjData::Float(_), ObjData::Float(_)) => {
            num_eq_strict(a, b)
        }
        (ObjData::Symbol(_), ObjData::Symbol(_)) | (ObjData::Cons(..), ObjData::Cons(..)) => {
            Object::eq(a, b)
        }
        (ObjData::Str(x), ObjData::Str(y)) => x == y,
        (ObjData::Vector(_), ObjData::Vector(_)) => false,
        (ObjData::Cfunc(x), ObjData::Cfunc(y))
        | (ObjData::Special(x), ObjData::Special(y)) => *x as usize == *y as usize,
        _ => false,
    };
    Ok(w.bool(r))
}

pub fn lisp_hash(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 1, "hash")?;
    Ok(Object::bigint(BigInt::from(args[0].hash_value())))
}

pub fn register(w: &Wisp) {
    sset(w, "cons", Object::cfunc(lisp_cons));
    sset(w, "car", Object::cfunc(lisp_car));
    sset(w, "cdr", Object::cfunc(lisp_cdr));
    sset(w, "list", Object::cfunc(lisp_list));
    sset(w, "eq", Object::cfunc(eq));
    sset(w, "eql", Object::cfunc(eql));
    sset(w, "hash", Object::cfunc(lisp_hash));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cons_car_cdr() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(cons 1 2)").unwrap().print(true), "(1 . 2)");
        assert_eq!(w.eval_str("(cons 1 '(2 3))").unwrap().print(true), "(1 2 3)");
        assert_eq!(w.eval_str("(car '(1 2))").unwrap().print(true), "1");
        assert_eq!(w.eval_str("(cdr '(1 2))").unwrap().print(true), "(2)");
        // cdr of a one-element proper list is NIL.
        assert!(w.eval_str("(cdr '(1))").unwrap().is_nil());
        assert!(w.eval_str("(car nil)").unwrap().is_nil());
        assert!(w.eval_str("(cdr nil)").unwrap().is_nil());
    }

    #[test]
    fn test_car_wrong_type() {
        let w = Wisp::new();
        let err = w.eval_str("(car 5)").unwrap_err();
        assert_eq!(err.tag.print(true), "wrong-type-argument");
    }

    #[test]
    fn test_list() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(list 1 2 3)").unwrap().print(true), "(1 2 3)");
        assert!(w.eval_str("(list)").unwrap().is_nil());
    }

    #[test]
    fn test_eq_identity() {
        let w = Wisp::new();
        assert!(w.eval_str("(eq 'a 'a)").unwrap().truthy());
        assert!(w.eval_str("(eq nil nil)").unwrap().truthy());
        // Freshly-boxed numbers are distinct objects.
        assert!(w.eval_str("(eq 1 1)").unwrap().is_nil());
        assert!(w
            .eval_str("(let ((x '(1))) (eq x x))")
            .unwrap()
            .truthy());
    }

    #[test]
    fn test_eql_atoms() {
        let w = Wisp::new();
        assert!(w.eval_str("(eql 1 1)").unwrap().truthy());
        assert!(w.eval_str("(eql 1 2)").unwrap().is_nil());
        assert!(w.eval_str("(eql 1.5 1.5)").unwrap().truthy());
        // INT and FLOAT are different variants.
        assert!(w.eval_str("(eql 1 1.0)").unwrap().is_nil());
        assert!(w.eval_str("(eql \"ab\" \"ab\")").unwrap().truthy());
        assert!(w.eval_str("(eql \"ab\" \"ac\")").unwrap().is_nil());
        assert!(w.eval_str("(eql 'a 'a)").unwrap().truthy());
    }

    #[test]
    fn test_eql_conses_by_identity() {
        let w = Wisp::new();
        assert!(w.eval_str("(eql '(1) '(1))").unwrap().is_nil());
        assert!(w
            .eval_str("(let ((x '(1))) (eql x x))")
            .unwrap()
            .truthy());
    }

    #[test]
    fn test_eql_vectors_always_nil() {
        let w = Wisp::new();
        assert!(w.eval_str("(eql [1] [1])").unwrap().is_nil());
        // Even identical vectors.
        assert!(w
            .eval_str("(let ((v [1 2])) (eql v v))")
            .unwrap()
            .is_nil());
    }

    #[test]
    fn test_hash_structural() {
        let w = Wisp::new();
        assert!(w
            .eval_str("(eql (hash '(1 2)) (hash '(1 2)))")
            .unwrap()
            .truthy());
        assert!(w.eval_str("(hash [1 2 3])").unwrap().is_int());
    }
}
