//! The catch/throw error model
//!
//! `throw` puts a (tag . attachment) pair in flight; the nearest enclosing
//! `catch` whose tag is `eq` to it consumes the pair and yields the
//! attachment. Everything else propagates.

use super::sset;
use crate::error::{EvalResult, Thrown};
use crate::eval::{eval, eval_body};
use crate::interp::Wisp;
use crate::object::Object;

/// `(throw tag attach)`: missing arguments throw as NIL.
pub fn lisp_throw(w: &Wisp, lst: &Object) -> EvalResult {
    let tag = match lst.as_cons() {
        Some((car, _)) => car.clone(),
        None => w.nil(),
    };
    let attach = lst
        .as_cons()
        .and_then(|(_, rest)| rest.as_cons().map(|(a, _)| a.clone()))
        .unwrap_or_else(|| w.nil());
    Err(Thrown::new(tag, attach))
}

/// `(catch tag-expr body…)`: a SPECIAL form; the tag is evaluated, the
/// body runs, and a matching throw becomes the catch's value.
pub fn lisp_catch(w: &Wisp, lst: &Object) -> EvalResult {
    let (tag_expr, body) = match lst.as_cons() {
        Some((a, b)) => (a.clone(), b.clone()),
        None => (w.nil(), w.nil()),
    };
    let tag = eval(w, &tag_expr)?;
    match eval_body(w, &body) {
        Ok(v) => Ok(v),
        Err(t) if Object::eq(&t.tag, &tag) => Ok(t.attach),
        Err(t) => Err(t),
    }
}

pub fn register(w: &Wisp) {
    sset(w, "throw", Object::cfunc(lisp_throw));
    sset(w, "catch", Object::special(lisp_catch));
}

#[cfg(test)]
mod tests {
    use crate::interp::Wisp;

    #[test]
    fn test_catch_matching_tag() {
        let w = Wisp::new();
        assert_eq!(
            w.eval_str(r#"(catch 'e (throw 'e "oops"))"#)
                .unwrap()
                .print(false),
            "oops"
        );
    }

    #[test]
    fn test_catch_other_tag_rethrows() {
        let w = Wisp::new();
        let err = w.eval_str("(catch 'x (throw 'y 1))").unwrap_err();
        assert_eq!(err.tag.print(true), "y");
        assert_eq!(err.attach.print(true), "1");
    }

    #[test]
    fn test_catch_passes_through_clean_value() {
        let w = Wisp::new();
        assert_eq!(w.eval_str("(catch 'e 1 2 3)").unwrap().print(true), "3");
    }

    #[test]
    fn test_nested_catch() {
        let w = Wisp::new();
        assert_eq!(
            w.eval_str("(catch 'outer (catch 'inner (throw 'outer 7)))")
                .unwrap()
                .print(true),
            "7"
        );
    }

    #[test]
    fn test_catch_tags_compare_by_identity() {
        let w = Wisp::new();
        // Strings are never eq, so a string tag does not match.
        let err = w
            .eval_str(r#"(catch "e" (throw "e" 1))"#)
            .unwrap_err();
        assert!(err.tag.is_string());
    }

    #[test]
    fn test_throw_defaults_to_nil() {
        let w = Wisp::new();
        let err = w.eval_str("(throw)").unwrap_err();
        assert!(err.tag.is_nil());
        assert!(err.attach.is_nil());
    }

    #[test]
    fn test_catch_catches_builtin_errors() {
        let w = Wisp::new();
        let r = w
            .eval_str("(catch 'wrong-type-argument (car 5))")
            .unwrap();
        assert_eq!(r.print(true), "5");
    }
}
