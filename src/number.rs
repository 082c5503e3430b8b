// ABOUTME: Numeric payloads: arbitrary-precision integers, floats, coercion

use crate::object::{ObjData, Object};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::cmp::Ordering;

/// Parse the whole buffer as an integer. Returns None if any trailing
/// characters remain, matching the reader's atom classification order.
pub fn parse_int(text: &str) -> Option<Object> {
    text.parse::<BigInt>().ok().map(Object::bigint)
}

/// Parse the whole buffer as a float.
pub fn parse_float(text: &str) -> Option<Object> {
    text.parse::<f64>().ok().map(Object::float)
}

/// A borrowed numeric view used by the math primitives.
pub enum Num<'a> {
    Int(&'a BigInt),
    Float(f64),
}

pub fn coerce(o: &Object) -> Option<Num<'_>> {
    match o.data() {
        ObjData::Int(n) => Some(Num::Int(n)),
        ObjData::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

pub fn int_to_f64(n: &BigInt) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

/// Numeric comparison with INT→FLOAT promotion on mixed operands.
pub fn num_cmp(a: &Object, b: &Object) -> Option<Ordering> {
    match (coerce(a)?, coerce(b)?) {
        (Num::Int(x), Num::Int(y)) => Some(x.cmp(y)),
        (x, y) => {
            let xf = match x {
                Num::Int(n) => int_to_f64(n),
                Num::Float(f) => f,
            };
            let yf = match y {
                Num::Int(n) => int_to_f64(n),
                Num::Float(f) => f,
            };
            xf.partial_cmp(&yf)
        }
    }
}

/// Same-variant numeric equality, the arm `eql` relies on. Callers have
/// already checked that the variants match; INT never equals FLOAT here.
pub fn num_eq_strict(a: &Object, b: &Object) -> bool {
    match (a.data(), b.data()) {
        (ObjData::Int(x), ObjData::Int(y)) => x == y,
        (ObjData::Float(x), ObjData::Float(y)) => x == y,
        _ => false,
    }
}

/// An INT usable as a vector index.
pub fn index_of(o: &Object) -> Option<usize> {
    o.as_int().and_then(|n| n.to_usize())
}
