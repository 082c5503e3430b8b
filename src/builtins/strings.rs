//! String primitives: concat2
//!
//! The richer string library (`concat`, padding, and friends) builds on
//! this single primitive in core.wisp.

use super::{args_exact, sset};
use crate::error::EvalResult;
use crate::interp::Wisp;
use crate::object::Object;

pub fn lisp_concat(w: &Wisp, lst: &Object) -> EvalResult {
    let args = args_exact(w, lst, 2, "concat2")?;
    let Some(a) = args[0].as_str() else {
        return Err(w.wrong_type(args[0].clone()));
    };
    let Some(b) = args[1].as_str() else {
        return Err(w.wrong_type(args[1].clone()));
    };
    let mut s = String::with_capacity(a.len() + b.len());
    s.push_str(a);
    s.push_str(b);
    Ok(Object::string(s))
}

pub fn register(w: &Wisp) {
    sset(w, "concat2", Object::cfunc(lisp_concat));
}

#[cfg(test)]
mod tests {
    use crate::interp::Wisp;

    #[test]
    fn test_concat2() {
        let w = Wisp::new();
        assert_eq!(
            w.eval_str(r#"(concat2 "foo" "bar")"#).unwrap().print(false),
            "foobar"
        );
        assert_eq!(
            w.eval_str(r#"(concat2 "" "x")"#).unwrap().print(false),
            "x"
        );
    }

    #[test]
    fn test_concat2_wrong_type() {
        let w = Wisp::new();
        let err = w.eval_str(r#"(concat2 "a" 1)"#).unwrap_err();
        assert_eq!(err.tag.print(true), "wrong-type-argument");
    }
}
