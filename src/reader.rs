// ABOUTME: Incremental character-level reader: source text to S-expressions

use crate::error::ReadError;
use crate::interp::Wisp;
use crate::number;
use crate::object::Object;
use std::io::BufRead;
use std::io::Write;

/// Characters allowed in a symbol name. Anything else inside an atom is a
/// syntax error.
const ATOM_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz\
                          0123456789!#$%^&*-_=+|\\/?.~<>";

const PROMPT: &str = "wisp> ";

/// One partially-built list. `dotpair_mode` walks 0 (accumulating) → 1
/// (dot seen, awaiting the cdr) → 2 (cdr filled, nothing more allowed).
/// A quote frame auto-closes after its single object arrives.
struct Frame {
    items: Vec<Object>,
    dotted_tail: Option<Object>,
    dotpair_mode: u8,
    quote_mode: bool,
    vector_mode: bool,
}

impl Frame {
    fn new() -> Frame {
        Frame {
            items: Vec::new(),
            dotted_tail: None,
            dotpair_mode: 0,
            quote_mode: false,
            vector_mode: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty() && self.dotted_tail.is_none()
    }
}

enum Input {
    Text { chars: Vec<char>, pos: usize },
    Stream { src: Box<dyn BufRead>, line: Vec<char>, pos: usize },
}

impl Input {
    fn next(&mut self) -> Option<char> {
        match self {
            Input::Text { chars, pos } => {
                let c = chars.get(*pos).copied();
                if c.is_some() {
                    *pos += 1;
                }
                c
            }
            Input::Stream { src, line, pos } => {
                if *pos >= line.len() {
                    let mut buf = String::new();
                    match src.read_line(&mut buf) {
                        Ok(0) | Err(_) => return None,
                        Ok(_) => {
                            *line = buf.chars().collect();
                            *pos = 0;
                        }
                    }
                }
                let c = line.get(*pos).copied();
                if c.is_some() {
                    *pos += 1;
                }
                c
            }
        }
    }
}

/// Reads one top-level S-expression per `read_sexp` call. On a syntax
/// error it reports, consumes the rest of the line, clears its state, and
/// stays usable for the next form.
pub struct Reader {
    input: Input,
    name: String,
    putback: Vec<char>,
    buf: String,
    stack: Vec<Frame>,
    line: u32,
    eof: bool,
    interactive: bool,
    shebang_checked: bool,
}

impl Reader {
    pub fn from_str(src: &str, name: &str) -> Reader {
        Reader::new(
            Input::Text {
                chars: src.chars().collect(),
                pos: 0,
            },
            name,
            false,
        )
    }

    pub fn from_stream(src: Box<dyn BufRead>, name: &str, interactive: bool) -> Reader {
        Reader::new(
            Input::Stream {
                src,
                line: Vec::new(),
                pos: 0,
            },
            name,
            interactive,
        )
    }

    fn new(input: Input, name: &str, interactive: bool) -> Reader {
        Reader {
            input,
            name: name.to_string(),
            putback: Vec::new(),
            buf: String::new(),
            stack: Vec::new(),
            line: 1,
            eof: false,
            interactive,
            // Interactive sessions never begin with a shebang line.
            shebang_checked: interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn at_eof(&self) -> bool {
        self.eof
    }

    fn getc(&mut self) -> Option<char> {
        if let Some(c) = self.putback.pop() {
            return Some(c);
        }
        self.input.next()
    }

    fn putc(&mut self, c: char) {
        self.putback.push(c);
    }

    /// Consume the rest of the line, including the linefeed.
    fn consume_line(&mut self) {
        while let Some(c) = self.getc() {
            if c == '\n' {
                self.line += 1;
                return;
            }
        }
    }

    /// Consume trailing whitespace on the current line, including the
    /// linefeed, so the next prompt starts on a fresh line.
    fn consume_whitespace(&mut self) {
        while let Some(c) = self.getc() {
            match c {
                ' ' | '\t' | '\r' => {}
                '\n' => {
                    self.line += 1;
                    return;
                }
                _ => {
                    self.putc(c);
                    return;
                }
            }
        }
    }

    fn print_prompt(&self) {
        if self.interactive && self.stack.len() == 1 {
            print!("{}", PROMPT);
            let _ = std::io::stdout().flush();
        }
    }

    fn top(&self) -> &Frame {
        self.stack.last().expect("parse stack has a frame")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.stack.last_mut().expect("parse stack has a frame")
    }

    fn push_frame(&mut self) {
        self.stack.push(Frame::new());
    }

    /// Report a diagnostic, then recover: consume the line, drop all parse
    /// state, and clear the buffers.
    fn read_error(&mut self, message: &str) -> ReadError {
        let e = ReadError {
            name: self.name.clone(),
            line: self.line,
            message: message.to_string(),
            premature_eof: false,
        };
        self.consume_line();
        self.reset();
        e
    }

    fn premature_eof(&mut self) -> ReadError {
        let e = ReadError {
            name: self.name.clone(),
            line: self.line,
            message: "premature end of file".to_string(),
            premature_eof: true,
        };
        self.reset();
        e
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.buf.clear();
        self.putback.clear();
    }

    /// Add a finished object to the top frame, filling the dotted tail when
    /// one is pending and auto-closing quote frames.
    fn add(&mut self, w: &Wisp, o: Object) -> Result<(), ReadError> {
        if self.top().dotpair_mode == 2 {
            return Err(self.read_error("invalid dotted pair syntax - too many objects"));
        }
        {
            let top = self.top_mut();
            if top.dotpair_mode == 1 {
                top.dotted_tail = Some(o);
                top.dotpair_mode = 2;
            } else {
                top.items.push(o);
            }
        }
        if self.top().quote_mode {
            self.addpop(w)?;
        }
        Ok(())
    }

    /// Close the top frame and add the finished object to its parent.
    fn addpop(&mut self, w: &Wisp) -> Result<(), ReadError> {
        let o = self.pop_frame(w)?;
        self.add(w, o)
    }

    fn pop_frame(&mut self, w: &Wisp) -> Result<Object, ReadError> {
        if self.stack.len() <= 1 {
            return Err(self.read_error("unbalanced parenthesis"));
        }
        if self.top().dotpair_mode == 1 {
            return Err(self.read_error("missing cdr object for dotted pair"));
        }
        let frame = self.stack.pop().expect("parse stack has a frame");
        if frame.vector_mode {
            return Ok(Object::vector(frame.items));
        }
        let tail = frame.dotted_tail.unwrap_or_else(|| w.nil());
        Ok(Object::list_from(frame.items, tail))
    }

    /// Read characters into the lexeme buffer until an unescaped halt
    /// character; the halt character is put back. A backslash quotes the
    /// character after it.
    fn buf_read(&mut self, halt: &str) {
        loop {
            let Some(c) = self.getc() else { return };
            if c == '\\' {
                if let Some(escaped) = self.getc() {
                    self.buf.push(escaped);
                    continue;
                }
                return;
            }
            if halt.contains(c) {
                self.putc(c);
                return;
            }
            self.buf.push(c);
        }
    }

    /// Read a string body up to the closing quote, decoding escapes. The
    /// closing quote is consumed.
    fn read_string(&mut self) -> Result<Object, ReadError> {
        let mut s = String::new();
        loop {
            let Some(c) = self.getc() else {
                self.eof = true;
                return Err(self.premature_eof());
            };
            match c {
                '"' => return Ok(Object::string(s)),
                '\\' => {
                    let Some(escaped) = self.getc() else {
                        self.eof = true;
                        return Err(self.premature_eof());
                    };
                    match escaped {
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        other => s.push(other),
                    }
                }
                '\n' => {
                    self.line += 1;
                    s.push(c);
                }
                _ => s.push(c),
            }
        }
    }

    /// Classify the lexeme buffer: integer, then float, then symbol over
    /// the atom character class.
    fn parse_atom(&mut self, w: &Wisp) -> Result<Object, ReadError> {
        let text = std::mem::take(&mut self.buf);
        if let Some(o) = number::parse_int(&text) {
            return Ok(o);
        }
        if let Some(o) = number::parse_float(&text) {
            return Ok(o);
        }
        for c in text.chars() {
            if !ATOM_CHARS.contains(c) {
                return Err(self.read_error(&format!("invalid symbol character: {}", c)));
            }
        }
        Ok(w.sym(&text))
    }

    /// On the very first read of a non-interactive source, a `#!` at the
    /// start of input discards the rest of line one.
    fn check_shebang(&mut self) {
        self.shebang_checked = true;
        let c1 = self.getc();
        let c2 = self.getc();
        if c1 == Some('#') && c2 == Some('!') {
            self.consume_line();
            return;
        }
        if let Some(c) = c2 {
            self.putc(c);
        }
        if let Some(c) = c1 {
            self.putc(c);
        }
    }

    /// Read the next top-level S-expression. `Ok(None)` is clean EOF; an
    /// `Err` has already been recovered from and the reader stays usable.
    pub fn read_sexp(&mut self, w: &Wisp) -> Result<Option<Object>, ReadError> {
        if !self.shebang_checked {
            self.check_shebang();
        }

        self.push_frame();
        self.print_prompt();

        while !self.eof && (self.top().is_empty() || self.stack.len() > 1) {
            let Some(c) = self.getc() else {
                self.eof = true;
                break;
            };
            match c {
                ';' => self.consume_line(),

                '.' => {
                    let nc = self.getc();
                    match nc {
                        Some(d) if " \t\r\n()".contains(d) => {
                            if self.top().dotpair_mode > 0 {
                                return Err(self.read_error("invalid dotted pair syntax"));
                            }
                            if self.top().vector_mode {
                                return Err(self.read_error("dotted pair not allowed in vector"));
                            }
                            self.top_mut().dotpair_mode = 1;
                            self.putc(d);
                        }
                        None => {
                            self.top_mut().dotpair_mode = 1;
                        }
                        Some(d) => {
                            // Leading decimal point: re-insert as a number.
                            self.putc(d);
                            self.putc('.');
                            self.putc('0');
                        }
                    }
                }

                '\n' => {
                    self.line += 1;
                    self.print_prompt();
                }
                ' ' | '\t' | '\r' => {}

                '(' => self.push_frame(),
                ')' => {
                    if self.top().quote_mode {
                        return Err(self.read_error("unbalanced parenthesis"));
                    }
                    if self.top().vector_mode {
                        return Err(self.read_error("unbalanced brackets"));
                    }
                    self.addpop(w)?;
                }

                '[' => {
                    self.push_frame();
                    self.top_mut().vector_mode = true;
                }
                ']' => {
                    if self.top().quote_mode {
                        return Err(self.read_error("unbalanced parenthesis"));
                    }
                    if !self.top().vector_mode {
                        return Err(self.read_error("unbalanced brackets"));
                    }
                    self.addpop(w)?;
                }

                '\'' => {
                    self.push_frame();
                    self.add(w, w.quote_sym().clone())?;
                    self.top_mut().quote_mode = true;
                }

                '"' => {
                    let s = self.read_string()?;
                    self.add(w, s)?;
                }

                _ => {
                    self.buf.push(c);
                    self.buf_read(" \t\r\n()[];");
                    let atom = self.parse_atom(w)?;
                    self.add(w, atom)?;
                }
            }
        }

        if !self.eof {
            self.consume_whitespace();
        }

        // The input ran out: decide between a clean end and a torn form.
        if self.stack.len() > 1
            || self.top().quote_mode
            || self.top().dotpair_mode == 1
        {
            return Err(self.premature_eof());
        }
        if self.top().is_empty() {
            self.stack.pop();
            return Ok(None);
        }

        let frame = self.stack.pop().expect("parse stack has a frame");
        let tail = frame.dotted_tail.unwrap_or_else(|| w.nil());
        let chain = Object::list_from(frame.items, tail);
        let sexp = match chain.as_cons() {
            Some((car, _)) => car.clone(),
            None => chain.clone(),
        };
        Ok(Some(sexp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_one(w: &Wisp, src: &str) -> Object {
        let mut r = Reader::from_str(src, "<test>");
        r.read_sexp(w).unwrap().unwrap()
    }

    fn read_err(w: &Wisp, src: &str) -> ReadError {
        let mut r = Reader::from_str(src, "<test>");
        r.read_sexp(w).unwrap_err()
    }

    #[test]
    fn test_read_atoms() {
        let w = Wisp::new();
        assert_eq!(read_one(&w, "42").print(true), "42");
        assert_eq!(read_one(&w, "-42").print(true), "-42");
        assert!(read_one(&w, "3.14").is_float());
        assert!(read_one(&w, "foo").is_symbol());
        assert!(read_one(&w, "+").is_symbol());
    }

    #[test]
    fn test_read_leading_decimal_point() {
        let w = Wisp::new();
        let o = read_one(&w, ".5");
        assert!(o.is_float());
        assert_eq!(o.print(true), "0.5");
    }

    #[test]
    fn test_read_list() {
        let w = Wisp::new();
        assert_eq!(read_one(&w, "(a b c)").print(true), "(a b c)");
        assert_eq!(read_one(&w, "(1 (2 3) 4)").print(true), "(1 (2 3) 4)");
        assert!(read_one(&w, "()").is_nil());
    }

    #[test]
    fn test_read_dotted_pair() {
        let w = Wisp::new();
        assert_eq!(read_one(&w, "(a . b)").print(true), "(a . b)");
        assert_eq!(read_one(&w, "(a b . c)").print(true), "(a b . c)");
        // Dot inside an atom stays part of the atom.
        assert!(read_one(&w, "a.b").is_symbol());
    }

    #[test]
    fn test_read_quote() {
        let w = Wisp::new();
        assert_eq!(read_one(&w, "'x").print(true), "(quote x)");
        assert_eq!(read_one(&w, "'(1 2)").print(true), "(quote (1 2))");
        assert_eq!(read_one(&w, "''x").print(true), "(quote (quote x))");
        assert_eq!(read_one(&w, "'(a . b)").print(true), "(quote (a . b))");
    }

    #[test]
    fn test_read_vector() {
        let w = Wisp::new();
        let v = read_one(&w, "[1 2 3]");
        assert!(v.is_vector());
        assert_eq!(v.print(true), "[1 2 3]");
        assert_eq!(read_one(&w, "[1 [2] []]").print(true), "[1 [2] []]");
    }

    #[test]
    fn test_read_string_escapes() {
        let w = Wisp::new();
        let s = read_one(&w, r#""hello\nworld""#);
        assert_eq!(s.as_str().unwrap(), "hello\nworld");
        let s = read_one(&w, r#""say \"hi\"""#);
        assert_eq!(s.as_str().unwrap(), "say \"hi\"");
        let s = read_one(&w, r#""a\\b""#);
        assert_eq!(s.as_str().unwrap(), "a\\b");
        let s = read_one(&w, r#""""#);
        assert_eq!(s.as_str().unwrap(), "");
    }

    #[test]
    fn test_read_comments() {
        let w = Wisp::new();
        assert_eq!(read_one(&w, "; comment\n42").print(true), "42");
        assert_eq!(read_one(&w, "(1 ; comment\n 2)").print(true), "(1 2)");
    }

    #[test]
    fn test_read_shebang() {
        let w = Wisp::new();
        assert_eq!(read_one(&w, "#!/usr/bin/wisp\n42").print(true), "42");
        // Only honored at the very start of input; elsewhere `#` and `!`
        // are ordinary atom characters.
        let mut r = Reader::from_str("42 #!", "<test>");
        assert_eq!(r.read_sexp(&w).unwrap().unwrap().print(true), "42");
        assert_eq!(r.read_sexp(&w).unwrap().unwrap().print(true), "#!");
    }

    #[test]
    fn test_read_sequential_forms() {
        let w = Wisp::new();
        let mut r = Reader::from_str("1 (2 3)\n4", "<test>");
        assert_eq!(r.read_sexp(&w).unwrap().unwrap().print(true), "1");
        assert_eq!(r.read_sexp(&w).unwrap().unwrap().print(true), "(2 3)");
        assert_eq!(r.read_sexp(&w).unwrap().unwrap().print(true), "4");
        assert!(r.read_sexp(&w).unwrap().is_none());
    }

    #[test]
    fn test_read_error_recovery() {
        let w = Wisp::new();
        let mut r = Reader::from_str("(1 . 2 3)\n(4 5)", "<test>");
        let e = r.read_sexp(&w).unwrap_err();
        assert!(e.message.contains("too many objects"));
        assert!(!e.premature_eof);
        // The reader consumed the broken line and keeps going.
        assert_eq!(r.read_sexp(&w).unwrap().unwrap().print(true), "(4 5)");
    }

    #[test]
    fn test_read_unbalanced_close() {
        let w = Wisp::new();
        let e = read_err(&w, ")");
        assert!(e.message.contains("unbalanced parenthesis"));
    }

    #[test]
    fn test_read_mismatched_brackets() {
        let w = Wisp::new();
        assert!(read_err(&w, "(1 2]").message.contains("unbalanced brackets"));
        assert!(read_err(&w, "[1 2)").message.contains("unbalanced brackets"));
    }

    #[test]
    fn test_read_dotted_pair_in_vector_rejected() {
        let w = Wisp::new();
        let e = read_err(&w, "[1 . 2]");
        assert!(e.message.contains("dotted pair not allowed in vector"));
    }

    #[test]
    fn test_read_invalid_symbol_character() {
        let w = Wisp::new();
        let e = read_err(&w, "(foo`bar)");
        assert!(e.message.contains("invalid symbol character: `"));
    }

    #[test]
    fn test_read_premature_eof() {
        let w = Wisp::new();
        assert!(read_err(&w, "(1 2").premature_eof);
        assert!(read_err(&w, "'").premature_eof);
        assert!(read_err(&w, "\"abc").premature_eof);
        assert!(read_err(&w, "(a .").premature_eof);
    }

    #[test]
    fn test_read_error_reports_line() {
        let w = Wisp::new();
        let mut r = Reader::from_str("(1\n2\n.3 .)\n", "file.wisp");
        let e = r.read_sexp(&w).unwrap_err();
        assert_eq!(e.name, "file.wisp");
        assert_eq!(e.line, 3);
    }

    #[test]
    fn test_read_empty_input() {
        let w = Wisp::new();
        let mut r = Reader::from_str("   ; just a comment\n", "<test>");
        assert!(r.read_sexp(&w).unwrap().is_none());
        assert!(r.at_eof());
    }

    #[test]
    fn test_round_trip() {
        let w = Wisp::new();
        for src in [
            "(a b c)",
            "(a . b)",
            "(1 (2 3) (4 . 5))",
            "[1 2 [3]]",
            "\"a\\nb\"",
            "(quote x)",
            "12345678901234567890",
        ] {
            let o = read_one(&w, src);
            let printed = o.print(true);
            let o2 = read_one(&w, &printed);
            assert_eq!(printed, o2.print(true));
        }
    }
}
