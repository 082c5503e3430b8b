// ABOUTME: The evaluator: apply, argument binding, body evaluation, error flow

use crate::error::{EvalResult, Thrown};
use crate::interp::Wisp;
use crate::object::{ObjData, Object};

/// The outermost evaluation entry. Resets the depth counter and reports
/// any uncaught throw as `Wisp error: (<tag> <attach>)`.
pub fn top_eval(w: &Wisp, o: &Object) -> EvalResult {
    w.reset_depth();
    match eval(w, o) {
        Ok(v) => Ok(v),
        Err(t) => {
            let report = Object::cons(t.tag.clone(), Object::cons(t.attach.clone(), w.nil()));
            println!("Wisp error: {}", report);
            Err(t)
        }
    }
}

pub fn eval(w: &Wisp, o: &Object) -> EvalResult {
    if w.take_interrupt() {
        return Err(w.thrown("caught-interrupt", Object::string("interrupted")));
    }

    let head = match o.data() {
        ObjData::Symbol(_) => return w.get(o),
        ObjData::Cons(head, _) => head,
        _ => return Ok(o.clone()),
    };

    // Find the function.
    let mut f = eval(w, head)?;
    let mut form = o.clone();
    if f.is_vector() {
        // A vector in call position re-dispatches through `vfunc` with the
        // vector prepended to the form.
        form = Object::cons(f.clone(), o.clone());
        f = w.get(&w.sym("vfunc"))?;
    }
    if !f.is_func() {
        let culprit = match form.as_cons() {
            Some((car, _)) => car.clone(),
            None => form.clone(),
        };
        return Err(w.thrown("void-function", culprit));
    }

    w.enter_eval()?;
    let result = dispatch(w, &f, &form);
    w.leave_eval();
    result
}

fn dispatch(w: &Wisp, f: &Object, form: &Object) -> EvalResult {
    let args = match form.as_cons() {
        Some((_, rest)) => rest.clone(),
        None => w.nil(),
    };
    if matches!(f.data(), ObjData::Cfunc(_)) || f.is_lambda_form() {
        let args = eval_list(w, &args)?;
        apply(w, f, &args)
    } else {
        // SPECIAL and macro forms see their arguments unevaluated.
        apply(w, f, &args)
    }
}

/// Apply a callable to an argument list. Lambda bodies run with their
/// formals pushed; macro results are evaluated a second time.
pub fn apply(w: &Wisp, f: &Object, args: &Object) -> EvalResult {
    match f.data() {
        ObjData::Cfunc(func) | ObjData::Special(func) => func(w, args),
        _ => {
            let (_, rest) = match f.as_cons() {
                Some(parts) => parts,
                None => return Err(w.thrown("bad-function-form", f.clone())),
            };
            let (formals, body) = match rest.as_cons() {
                Some((formals, body)) => (formals.clone(), body.clone()),
                None => return Err(w.thrown("bad-function-form", f.clone())),
            };

            assign_args(w, &formals, args).map_err(|mut t| {
                t.attach = args.clone();
                t
            })?;
            let result = if f.is_lambda_form() {
                eval_body(w, &body)
            } else {
                // Macro: the body produces a form, which then runs.
                eval_body(w, &body).and_then(|expansion| eval(w, &expansion))
            };
            unassign_args(w, &formals);
            result
        }
    }
}

/// Evaluate every element left to right into a fresh list. A non-NIL
/// non-CONS tail is an error; partial results are released on the way out.
pub fn eval_list(w: &Wisp, lst: &Object) -> EvalResult {
    if lst.is_nil() {
        return Ok(w.nil());
    }
    let Some((car, cdr)) = lst.as_cons() else {
        return Err(w.thrown("improper-list-ending", lst.clone()));
    };
    let head = eval(w, car)?;
    let tail = eval_list(w, cdr)?;
    Ok(Object::cons(head, tail))
}

/// Evaluate forms in sequence, returning the last value (NIL when empty).
pub fn eval_body(w: &Wisp, body: &Object) -> EvalResult {
    let mut result = w.nil();
    let mut cur = body.clone();
    loop {
        let (car, cdr) = match cur.as_cons() {
            Some((a, b)) => (a.clone(), b.clone()),
            None => return Ok(result),
        };
        result = eval(w, &car)?;
        cur = cdr;
    }
}

/// Bind actuals to formals. `&optional` makes missing actuals bind NIL;
/// `&rest` binds the remaining actuals list and stops. On any arity
/// mismatch every binding pushed by this call is rolled back first.
pub fn assign_args(w: &Wisp, formals: &Object, actuals: &Object) -> Result<(), Thrown> {
    let mut optional_mode = false;
    let mut pushed: Vec<Object> = Vec::new();
    let mut vars = formals.clone();
    let mut vals = actuals.clone();

    loop {
        let (var, vars_rest) = match vars.as_cons() {
            Some((a, b)) => (a.clone(), b.clone()),
            None => break,
        };

        if Object::eq(&var, w.optional_sym()) {
            optional_mode = true;
            vars = vars_rest;
            continue;
        }

        if Object::eq(&var, w.rest_sym()) {
            // Bind the remaining actuals to the next formal and finish.
            let rest_var = match vars_rest.as_cons() {
                Some((v, _)) => v.clone(),
                None => {
                    rollback(&pushed);
                    return Err(w.thrown("bad-function-form", formals.clone()));
                }
            };
            if let Some(sym) = rest_var.as_symbol() {
                sym.push(vals.clone());
                pushed.push(rest_var.clone());
            }
            vals = w.nil();
            break;
        }

        if vals.is_nil() {
            if !optional_mode {
                rollback(&pushed);
                return Err(w.thrown("wrong-number-of-arguments", w.nil()));
            }
            if let Some(sym) = var.as_symbol() {
                sym.push(w.nil());
                pushed.push(var.clone());
            }
        } else {
            let (val, vals_rest) = match vals.as_cons() {
                Some((a, b)) => (a.clone(), b.clone()),
                None => {
                    rollback(&pushed);
                    return Err(w.thrown("wrong-number-of-arguments", w.nil()));
                }
            };
            if let Some(sym) = var.as_symbol() {
                sym.push(val);
                pushed.push(var.clone());
            }
            vals = vals_rest;
        }
        vars = vars_rest;
    }

    if !vals.is_nil() {
        rollback(&pushed);
        return Err(w.thrown("wrong-number-of-arguments", w.nil()));
    }
    Ok(())
}

fn rollback(pushed: &[Object]) {
    for var in pushed.iter().rev() {
        if let Some(sym) = var.as_symbol() {
            sym.pop();
        }
    }
}

/// Pop every formal's binding, skipping the `&optional`/`&rest` markers.
pub fn unassign_args(w: &Wisp, formals: &Object) {
    let mut vars = formals.clone();
    loop {
        let (var, rest) = match vars.as_cons() {
            Some((a, b)) => (a.clone(), b.clone()),
            None => return,
        };
        if !Object::eq(&var, w.rest_sym()) && !Object::eq(&var, w.optional_sym()) {
            if let Some(sym) = var.as_symbol() {
                sym.pop();
            }
        }
        vars = rest;
    }
}
