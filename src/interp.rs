// ABOUTME: The interpreter context: singletons, depth counters, startup, file loading

use crate::builtins;
use crate::error::{EvalResult, Thrown, WispError};
use crate::eval;
use crate::object::Object;
use crate::reader::Reader;
use crate::symtab::SymbolTable;
use std::cell::Cell;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_MAX_EVAL_DEPTH: u32 = 20000;

/// One interpreter instance: symbol table, cached singletons, evaluator
/// counters, and the interrupt flag. Single-threaded by construction.
pub struct Wisp {
    symbols: SymbolTable,
    nil: Object,
    t: Object,
    quote: Object,
    lambda: Object,
    macro_sym: Object,
    rest: Object,
    optional: Object,
    stack_depth: Cell<u32>,
    max_depth: Cell<u32>,
    interrupt: Arc<AtomicBool>,
}

impl Wisp {
    /// Subsystem init in dependency order: singletons, evaluator symbols,
    /// then the builtin bindings.
    pub fn new() -> Wisp {
        let symbols = SymbolTable::new();

        let nil = symbols.intern_constant("nil");
        nil.as_symbol().expect("nil is a symbol").push(nil.clone());
        let t = symbols.intern_constant("t");
        t.as_symbol().expect("t is a symbol").push(t.clone());

        let w = Wisp {
            nil,
            t,
            quote: symbols.intern("quote"),
            lambda: symbols.intern("lambda"),
            macro_sym: symbols.intern("macro"),
            rest: symbols.intern("&rest"),
            optional: symbols.intern("&optional"),
            symbols,
            stack_depth: Cell::new(0),
            max_depth: Cell::new(DEFAULT_MAX_EVAL_DEPTH),
            interrupt: Arc::new(AtomicBool::new(false)),
        };
        builtins::register_builtins(&w);
        w
    }

    pub fn sym(&self, name: &str) -> Object {
        self.symbols.intern(name)
    }

    pub fn usym(&self, name: &str) -> Object {
        self.symbols.intern_constant(name)
    }

    pub fn nil(&self) -> Object {
        self.nil.clone()
    }

    pub fn t(&self) -> Object {
        self.t.clone()
    }

    /// NIL for false, T for true.
    pub fn bool(&self, b: bool) -> Object {
        if b {
            self.t()
        } else {
            self.nil()
        }
    }

    pub fn quote_sym(&self) -> &Object {
        &self.quote
    }

    pub fn lambda_sym(&self) -> &Object {
        &self.lambda
    }

    pub fn macro_sym(&self) -> &Object {
        &self.macro_sym
    }

    pub fn rest_sym(&self) -> &Object {
        &self.rest
    }

    pub fn optional_sym(&self) -> &Object {
        &self.optional
    }

    pub fn thrown(&self, tag: &str, attach: Object) -> Thrown {
        Thrown::new(self.sym(tag), attach)
    }

    pub fn wrong_type(&self, attach: Object) -> Thrown {
        self.thrown("wrong-type-argument", attach)
    }

    /// The current binding of a symbol; `void-variable` if it has none.
    pub fn get(&self, sym: &Object) -> EvalResult {
        let s = sym
            .as_symbol()
            .ok_or_else(|| self.wrong_type(sym.clone()))?;
        s.top()
            .ok_or_else(|| self.thrown("void-variable", sym.clone()))
    }

    // Depth accounting around every `eval` frame. The cap throws with the
    // depth it was hit at, then backs the counter off.
    pub fn enter_eval(&self) -> Result<(), Thrown> {
        let d = self.stack_depth.get() + 1;
        self.stack_depth.set(d);
        if d >= self.max_depth.get() {
            self.stack_depth.set(d - 1);
            return Err(self.thrown("max-eval-depth", Object::int(d as i64)));
        }
        Ok(())
    }

    pub fn leave_eval(&self) {
        self.stack_depth.set(self.stack_depth.get().saturating_sub(1));
    }

    pub fn reset_depth(&self) {
        self.stack_depth.set(0);
    }

    pub fn eval_depth(&self) -> u32 {
        self.stack_depth.get()
    }

    pub fn max_eval_depth(&self) -> u32 {
        self.max_depth.get()
    }

    pub fn set_max_eval_depth(&self, depth: u32) {
        self.max_depth.set(depth);
    }

    /// Shared with the SIGINT handler installed by the binary.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::Relaxed)
    }

    /// Bind `wisproot` from the environment and load `<WISPROOT>/core.wisp`.
    pub fn load_core(&self) -> Result<(), WispError> {
        let wisproot = std::env::var("WISPROOT").unwrap_or_else(|_| ".".to_string());
        self.sym("wisproot")
            .as_symbol()
            .expect("wisproot is a symbol")
            .set_top(Object::string(wisproot.clone()));

        let path = Path::new(&wisproot).join("core.wisp");
        self.load_file(&path).map_err(|source| WispError::CoreLoad {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read and evaluate every form in a file. Reader errors are reported
    /// and reading continues with the next line; evaluator errors are
    /// reported by `top_eval` and processing continues.
    pub fn load_file(&self, path: &Path) -> std::io::Result<()> {
        let file = File::open(path)?;
        let mut reader = Reader::from_stream(
            Box::new(std::io::BufReader::new(file)),
            &path.display().to_string(),
            false,
        );
        self.run(&mut reader);
        Ok(())
    }

    /// Drive a reader to EOF, evaluating each top-level form. In
    /// interactive mode successful results are printed.
    pub fn run(&self, reader: &mut Reader) {
        loop {
            match reader.read_sexp(self) {
                Ok(Some(sexp)) => {
                    if let Ok(result) = eval::top_eval(self, &sexp) {
                        if reader.is_interactive() {
                            println!("{}", result);
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    eprintln!("{}", e);
                    if e.premature_eof {
                        break;
                    }
                }
            }
        }
    }

    /// Parse and evaluate every form in `src`, returning the last value.
    /// A reader failure throws `parse-error`. Used by tests and
    /// `eval-string`.
    pub fn eval_str(&self, src: &str) -> EvalResult {
        let mut reader = Reader::from_str(src, "<string>");
        let mut result = self.nil();
        loop {
            match reader.read_sexp(self) {
                Ok(Some(sexp)) => {
                    self.reset_depth();
                    result = eval::eval(self, &sexp)?;
                }
                Ok(None) => return Ok(result),
                Err(_) => {
                    return Err(self.thrown("parse-error", Object::string(src)));
                }
            }
        }
    }
}

impl Default for Wisp {
    fn default() -> Self {
        Wisp::new()
    }
}
