// ABOUTME: CLI entry point: script runner and interactive REPL

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{BufReader, IsTerminal};
use std::path::PathBuf;
use wisp::eval::top_eval;
use wisp::{Object, ReadError, Reader, Wisp};

/// Wisp interpreter
#[derive(Parser, Debug)]
#[command(name = "wisp")]
#[command(version)]
#[command(about = "An embeddable Lisp dialect")]
#[command(long_about = "A small Lisp with lambdas, macros, vectors, \
arbitrary-precision integers, and a catch/throw error model")]
struct CliArgs {
    /// Script file to execute (starts the REPL when omitted)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Skip loading <WISPROOT>/core.wisp
    #[arg(long = "no-core")]
    no_core: bool,

    /// Read from stdin with the stream reader instead of line editing
    #[arg(long = "plain")]
    plain: bool,
}

fn main() {
    let args = CliArgs::parse();
    let w = Wisp::new();

    if !args.no_core {
        if let Err(e) = w.load_core() {
            eprintln!("error: {}", e);
            if std::env::var("WISPROOT").is_err() {
                eprintln!("warning: perhaps you should set WISPROOT");
            }
            std::process::exit(1);
        }
    }

    if let Some(path) = args.script {
        // Batch mode leaves the default SIGINT disposition in place.
        if let Err(e) = w.load_file(&path) {
            eprintln!("wisp: cannot open \"{}\": {}", path.display(), e);
            std::process::exit(1);
        }
        return;
    }

    install_interrupt_handler(&w);

    let tty = std::io::stdin().is_terminal();
    if args.plain || !tty {
        let mut reader =
            Reader::from_stream(Box::new(BufReader::new(std::io::stdin())), "<stdin>", tty);
        w.run(&mut reader);
        return;
    }

    repl(&w);
}

/// First Ctrl-C sets the flag the evaluator polls; a second one before the
/// first is consumed force-exits.
fn install_interrupt_handler(w: &Wisp) {
    let flag = w.interrupt_flag();
    let result = ctrlc::set_handler(move || {
        if flag.swap(true, std::sync::atomic::Ordering::Relaxed) {
            std::process::exit(130);
        }
    });
    if let Err(e) = result {
        eprintln!("warning: could not install interrupt handler: {}", e);
    }
}

/// What one REPL submission parsed into.
enum Forms {
    Complete(Vec<Object>),
    Incomplete,
    Broken(ReadError),
}

fn read_forms(w: &Wisp, src: &str) -> Forms {
    let mut reader = Reader::from_str(src, "<repl>");
    let mut forms = Vec::new();
    loop {
        match reader.read_sexp(w) {
            Ok(Some(form)) => forms.push(form),
            Ok(None) => return Forms::Complete(forms),
            Err(e) if e.premature_eof => return Forms::Incomplete,
            Err(e) => return Forms::Broken(e),
        }
    }
}

fn repl(w: &Wisp) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("wisp: cannot initialize line editor: {}", e);
            return;
        }
    };
    let history_file = ".wisp_history";
    let _ = rl.load_history(history_file);

    // Incomplete forms accumulate here and continue on the next prompt.
    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() { "wisp> " } else { "  ...> " };
        match rl.readline(prompt) {
            Ok(line) => {
                if pending.is_empty() && line.trim().is_empty() {
                    continue;
                }
                pending.push_str(&line);
                pending.push('\n');

                match read_forms(w, &pending) {
                    Forms::Incomplete => continue,
                    Forms::Broken(e) => {
                        eprintln!("{}", e);
                        pending.clear();
                    }
                    Forms::Complete(forms) => {
                        let _ = rl.add_history_entry(pending.trim_end());
                        pending.clear();
                        for form in forms {
                            if let Ok(result) = top_eval(w, &form) {
                                println!("{}", result);
                            }
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                pending.clear();
                // Drop any flag the handler set while we were editing.
                w.take_interrupt();
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("wisp: {}", e);
                break;
            }
        }
    }
    let _ = rl.save_history(history_file);
}
