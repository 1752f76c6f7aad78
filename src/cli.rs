use std::env;
use std::process;

use crate::config::{LabelMode, Locale};

/// Environment variable naming a default label table file.
pub const LABELS_ENV: &str = "FORMULA_OUTLINE_LABELS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Tree,
    Inline,
    Html,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Formula given on the command line; stdin is read when this and
    /// `formula_file` are both absent.
    pub formula: Option<String>,
    pub formula_file: Option<String>,
    /// `None` means detect from the environment.
    pub lang: Option<Locale>,
    pub label_mode: LabelMode,
    pub label_table: Option<String>,
    pub output: Output,
    pub collapsed: bool,
    pub repl: bool,
    pub verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

/// Parse the process arguments; prints usage and exits on error.
pub fn parse_args() -> Args {
    let raw: Vec<String> = env::args().skip(1).collect();
    match parse_args_from(&raw) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_usage();
            process::exit(0);
        }
        Ok(Command::Version) => {
            println!("formula-outline {}", env!("CARGO_PKG_VERSION"));
            process::exit(0);
        }
        Err(msg) => {
            eprintln!("formula-outline: {msg}");
            eprintln!("Try 'formula-outline --help' for usage.");
            process::exit(1);
        }
    }
}

pub fn parse_args_from(raw: &[String]) -> Result<Command, String> {
    let mut args = Args::default();
    let mut i = 0;

    while i < raw.len() {
        let arg = raw[i].as_str();

        if arg == "--" {
            // A formula may start with '-', e.g. `-- -A1*2`
            if let Some(rest) = raw.get(i + 1) {
                set_formula(&mut args, rest)?;
            }
            if raw.len() > i + 2 {
                return Err(format!("unexpected argument: {}", raw[i + 2]));
            }
            break;
        }

        match arg {
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "--inline" => args.output = Output::Inline,
            "--html" => args.output = Output::Html,
            "--collapsed" => args.collapsed = true,
            "--repl" => args.repl = true,
            "-v" | "--verbose" => args.verbose = true,
            "-l" | "--lang" => {
                let v = value(raw, &mut i, arg)?;
                args.lang = Some(v.parse()?);
            }
            "-m" | "--labels" => {
                let v = value(raw, &mut i, arg)?;
                args.label_mode = v.parse()?;
            }
            "-t" | "--label-table" => {
                args.label_table = Some(value(raw, &mut i, arg)?.to_string());
            }
            "-f" => {
                args.formula_file = Some(value(raw, &mut i, arg)?.to_string());
            }
            _ => {
                if let Some(v) = arg.strip_prefix("--lang=") {
                    args.lang = Some(v.parse()?);
                } else if let Some(v) = arg.strip_prefix("--labels=") {
                    args.label_mode = v.parse()?;
                } else if let Some(v) = arg.strip_prefix("--label-table=") {
                    args.label_table = Some(v.to_string());
                } else if arg.starts_with("--") {
                    return Err(format!("unknown option: {arg}"));
                } else if let Some(v) = arg.strip_prefix("-l").filter(|v| !v.is_empty()) {
                    args.lang = Some(v.parse()?);
                } else if let Some(v) = arg.strip_prefix("-m").filter(|v| !v.is_empty()) {
                    args.label_mode = v.parse()?;
                } else if arg.starts_with('-') && arg.len() > 1 && !looks_like_formula(arg) {
                    return Err(format!("unknown option: {arg}"));
                } else {
                    set_formula(&mut args, arg)?;
                }
            }
        }

        i += 1;
    }

    if args.formula.is_some() && args.formula_file.is_some() {
        return Err("give the formula either inline or with -f, not both".to_string());
    }
    if args.output == Output::Inline && args.collapsed {
        return Err("--collapsed has no effect with --inline".to_string());
    }

    Ok(Command::Run(args))
}

fn value<'a>(raw: &'a [String], i: &mut usize, opt: &str) -> Result<&'a str, String> {
    *i += 1;
    raw.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{opt} requires an argument"))
}

fn set_formula(args: &mut Args, text: &str) -> Result<(), String> {
    if args.formula.is_some() {
        return Err(format!("unexpected argument: {text}"));
    }
    args.formula = Some(text.to_string());
    Ok(())
}

/// `-5+A1` or `-(A1)` is a formula, not a flag.
fn looks_like_formula(arg: &str) -> bool {
    arg[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '(' || c == '$' || c == '-')
}

fn print_usage() {
    eprintln!(
        "formula-outline {}: make long Excel formulas a little more readable",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!("Usage: formula-outline [options] 'formula'");
    eprintln!("       formula-outline [options] < formula.txt");
    eprintln!("       formula-outline --repl [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -l, --lang ja|en         Message and generic label language (default: from LANG)");
    eprintln!("  -m, --labels MODE        Argument labels: auto, ja1, ja2, en, off (default: auto)");
    eprintln!("  -t, --label-table FILE   JSON argument label dictionary (or ${LABELS_ENV})");
    eprintln!("  -f FILE                  Read the formula from FILE");
    eprintln!("  --inline                 Print the canonical one-line form");
    eprintln!("  --html                   Print collapsible HTML markup");
    eprintln!("  --collapsed              Start with every function block collapsed");
    eprintln!("  --repl                   Interactive mode (type :help inside)");
    eprintln!("  -v, --verbose            Debug logging on stderr");
    eprintln!("  -h, --help               Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  formula-outline '=IF(A1>0,SUM(B1:B3),\"none\")'");
    eprintln!("  formula-outline -l en -m off --inline '=if(a1>0,1,-1)'");
    eprintln!("  formula-outline -t labels.json --repl");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<Command, String> {
        let raw: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args_from(&raw)
    }

    fn parsed(args: &[&str]) -> Args {
        match run(args) {
            Ok(Command::Run(a)) => a,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn formula_and_options() {
        let a = parsed(&["-l", "en", "--labels=off", "-t", "l.json", "=SUM(1)"]);
        assert_eq!(a.lang, Some(Locale::En));
        assert_eq!(a.label_mode, LabelMode::Off);
        assert_eq!(a.label_table.as_deref(), Some("l.json"));
        assert_eq!(a.formula.as_deref(), Some("=SUM(1)"));
        assert_eq!(a.output, Output::Tree);
    }

    #[test]
    fn glued_short_options() {
        let a = parsed(&["-lja", "-mja2", "--html", "A1"]);
        assert_eq!(a.lang, Some(Locale::Ja));
        assert_eq!(a.label_mode, LabelMode::Ja2);
        assert_eq!(a.output, Output::Html);
    }

    #[test]
    fn leading_minus_formula() {
        assert_eq!(parsed(&["-5+A1"]).formula.as_deref(), Some("-5+A1"));
        assert_eq!(parsed(&["--", "-x"]).formula.as_deref(), Some("-x"));
    }

    #[test]
    fn errors() {
        assert!(run(&["--bogus"]).is_err());
        assert!(run(&["-m"]).is_err());
        assert!(run(&["-m", "jp"]).is_err());
        assert!(run(&["A1", "B1"]).is_err());
        assert!(run(&["-f", "x.txt", "A1"]).is_err());
        assert!(run(&["--inline", "--collapsed", "A1"]).is_err());
    }

    #[test]
    fn help_and_version() {
        assert_eq!(run(&["-h"]), Ok(Command::Help));
        assert_eq!(run(&["--version"]), Ok(Command::Version));
    }
}
