// ABOUTME: Symbol interning and per-symbol value stacks

use crate::object::{Object, ObjData};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// An interned named entity. The value stack implements shadowing scope:
/// binding pushes, leaving scope pops, lookup reads the top.
#[derive(Debug)]
pub struct Symbol {
    name: String,
    constant: Cell<bool>,
    stack: RefCell<Vec<Object>>,
}

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            constant: Cell::new(false),
            stack: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_constant(&self) -> bool {
        self.constant.get()
    }

    pub fn mark_constant(&self) {
        self.constant.set(true);
    }

    /// Push a new binding, shadowing any existing one.
    pub fn push(&self, val: Object) {
        self.stack.borrow_mut().push(val);
    }

    /// Discard the top binding.
    pub fn pop(&self) -> Option<Object> {
        self.stack.borrow_mut().pop()
    }

    /// The current binding, if any.
    pub fn top(&self) -> Option<Object> {
        self.stack.borrow().last().cloned()
    }

    /// Replace the top binding, initializing the stack if it is empty.
    /// `defun` and builtin registration both bind names that have never
    /// been pushed.
    pub fn set_top(&self, val: Object) {
        let mut stack = self.stack.borrow_mut();
        match stack.last_mut() {
            Some(top) => *top = val,
            None => stack.push(val),
        }
    }

    /// Stack height; the balance tests assert this is restored after
    /// every `top_eval`.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }
}

/// Name → SYMBOL map. `intern` always returns the same object for the same
/// name, so `eq` on symbols is identity.
#[derive(Debug, Default)]
pub struct SymbolTable {
    map: RefCell<HashMap<String, Object>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn intern(&self, name: &str) -> Object {
        if let Some(sym) = self.map.borrow().get(name) {
            return sym.clone();
        }
        let sym = Object::from_data(ObjData::Symbol(Symbol::new(name)));
        self.map
            .borrow_mut()
            .insert(name.to_string(), sym.clone());
        sym
    }

    /// Intern and mark the symbol constant (`set` will refuse it).
    pub fn intern_constant(&self, name: &str) -> Object {
        let sym = self.intern(name);
        sym.as_symbol()
            .expect("interned object is a symbol")
            .mark_constant();
        sym
    }
}
