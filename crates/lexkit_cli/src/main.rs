//! lexkit: tokenize a file with a rule set.
//!
//! Usage:
//!   lexkit --rules rules.json [options] [FILE]
//!
//! Reads FILE (or stdin) and prints one line per token. Exits with 1 on
//! usage, rule-set or I/O errors and with 2 when scanning reported errors.

use clap::Parser as ClapParser;
use lexkit_core::text::{text_pos, LineMap};
use lexkit_diagnostics::Diagnostic;
use lexkit_rules::RuleSet;
use lexkit_scanner::{Stream, Token, TokenKey};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Once;

#[derive(ClapParser, Debug)]
#[command(name = "lexkit", about = "lexkit - a configurable lexical scanner", version)]
struct Cli {
    /// Input file. Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Rule-set JSON file describing the tokenizer.
    #[arg(short = 'r', long, value_name = "RULES")]
    rules: PathBuf,

    /// Print tokens as JSON.
    #[arg(long)]
    json: bool,

    /// Only print tokens around token ID.
    #[arg(long, value_name = "ID:BEFORE:AFTER", value_parser = parse_snippet)]
    snippet: Option<SnippetArg>,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SnippetArg {
    id: usize,
    before: usize,
    after: usize,
}

fn parse_snippet(arg: &str) -> Result<SnippetArg, String> {
    let parts: Vec<&str> = arg.split(':').collect();
    let [id, before, after] = parts.as_slice() else {
        return Err(format!("expected ID:BEFORE:AFTER, got '{}'", arg));
    };
    let number = |text: &str| {
        text.parse::<usize>()
            .map_err(|_| format!("'{}' is not a token count", text))
    };
    Ok(SnippetArg {
        id: number(*id)?,
        before: number(*before)?,
        after: number(*after)?,
    })
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let use_color = !cli.no_color && std::io::stderr().is_terminal();

    let rules = match RuleSet::load(&cli.rules) {
        Ok(rules) => rules,
        Err(err) => {
            print_error(&err.to_string(), use_color);
            return 1;
        }
    };
    let tokenizer = match rules.build() {
        Ok(tokenizer) => tokenizer,
        Err(err) => {
            print_error(&err.to_string(), use_color);
            return 1;
        }
    };

    let input = match read_input(cli.file.as_ref()) {
        Ok(input) => input,
        Err(err) => {
            print_error(&err.to_string(), use_color);
            return 1;
        }
    };

    let mut stream = tokenizer.parse_bytes(&input);
    tracing::debug!(tokens = stream.len(), "scanned");

    let tokens = match cli.snippet {
        Some(snippet) => {
            stream.go_to(snippet.id);
            if !stream.is_valid() {
                print_error(
                    &format!("no token {} (stream has {})", snippet.id, stream.len()),
                    use_color,
                );
                return 1;
            }
            stream.snippet(snippet.before, snippet.after)
        }
        None => stream.tokens(),
    };

    if cli.json {
        println!("{}", tokens_to_json(tokens, &rules));
    } else {
        print_table(tokens, &rules, &input);
    }

    report_diagnostics(&stream, cli.file.as_ref(), &input, use_color)
}

fn read_input(file: Option<&PathBuf>) -> std::io::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path),
        None => {
            let mut input = Vec::new();
            std::io::stdin().read_to_end(&mut input)?;
            Ok(input)
        }
    }
}

/// Display label of a token key, using names from the rule set when present.
fn key_label(key: TokenKey, rules: &RuleSet) -> String {
    match key {
        TokenKey::Custom(custom) => match rules.key_name(custom) {
            Some(name) => name.to_string(),
            None => custom.to_string(),
        },
        reserved => reserved.to_string(),
    }
}

fn print_table(tokens: &[Token<'_>], rules: &RuleSet, input: &[u8]) {
    let lines = LineMap::new(input);
    for token in tokens {
        let position = lines.line_and_column_of(text_pos(token.offset));
        println!(
            "{:>5}  {:<9}  {:<16}  {:?}",
            token.id,
            position.to_string(),
            key_label(token.key, rules),
            token.value_str()
        );
    }
}

fn tokens_to_json(tokens: &[Token<'_>], rules: &RuleSet) -> String {
    let tokens: Vec<serde_json::Value> = tokens
        .iter()
        .map(|token| {
            serde_json::json!({
                "id": token.id,
                "key": key_label(token.key, rules),
                "reserved": token.key.reserved_index(),
                "custom": token.key.custom().map(|key| key.0),
                "value": token.value_str(),
                "indent": token.indent_str(),
                "offset": token.offset,
                "line": token.line,
                "string": token.string.map(|rule| rule.index()),
            })
        })
        .collect();
    serde_json::to_string_pretty(&tokens).unwrap_or_else(|_| String::from("[]"))
}

/// Print scan diagnostics to stderr; returns the process exit code.
fn report_diagnostics(
    stream: &Stream<'_>,
    file: Option<&PathBuf>,
    input: &[u8],
    use_color: bool,
) -> i32 {
    let diagnostics = stream.diagnostics();
    if diagnostics.is_empty() {
        return 0;
    }
    let lines = LineMap::new(input);
    let file_name = file.map(|path| path.display().to_string());
    for diag in diagnostics {
        let diag = match &file_name {
            Some(name) => diag.clone().in_file(name.as_str()),
            None => diag.clone(),
        };
        print_diagnostic(&diag, &lines, use_color);
    }
    if diagnostics.has_errors() {
        2
    } else {
        0
    }
}

fn print_diagnostic(diag: &Diagnostic, lines: &LineMap, use_color: bool) {
    if !use_color {
        eprintln!("{}", diag.render(lines));
        return;
    }
    let color = if diag.is_error() { RED } else { YELLOW };
    if let Some(ref file) = diag.file {
        eprint!("{}{}{}:", CYAN, file, RESET);
    }
    if let Some(span) = diag.span {
        eprint!("{}{}{}: ", CYAN, lines.line_and_column_of(span.start), RESET);
    }
    eprintln!(
        "{}{}{}{} LK{}: {}",
        BOLD, color, diag.category, RESET, diag.code, diag.message_text
    );
}

fn print_error(msg: &str, use_color: bool) {
    if use_color {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}
