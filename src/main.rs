use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use log::{Level, LevelFilter, Log, Metadata, Record};

use formula_outline::cli::{self, LABELS_ENV, Output};
use formula_outline::format::{RenderPlan, plan_formula, render_html, render_text};
use formula_outline::{Config, LabelTable, Locale, format_inline, i18n, repl};

/// Plain `level: message` lines on stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                Level::Error => "error",
                Level::Warn => "warning",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            };
            eprintln!("formula-outline: {level}: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }
}

fn load_labels(path: Option<String>, locale: Locale) -> LabelTable {
    let Some(path) = path.or_else(|| env::var(LABELS_ENV).ok().filter(|p| !p.is_empty())) else {
        log::debug!("no label table given; using generic argument labels");
        return LabelTable::default();
    };
    match LabelTable::load(&path) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("{e}");
            eprintln!("{}", i18n::strings(locale).labels_unavailable);
            LabelTable::default()
        }
    }
}

fn read_formula(args: &cli::Args) -> io::Result<String> {
    if let Some(ref f) = args.formula {
        return Ok(f.clone());
    }
    if let Some(ref path) = args.formula_file {
        return fs::read_to_string(path);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn main() {
    let args = cli::parse_args();
    init_logging(args.verbose);

    let locale = args.lang.unwrap_or_else(Locale::from_env);
    log::debug!("locale {}, labels {}", locale.as_str(), args.label_mode.as_str());
    let table = load_labels(args.label_table.clone(), locale);

    if args.repl {
        let mut session = repl::Session::new(&table, locale, args.label_mode);
        repl::run(&mut session);
        return;
    }

    let source = match read_formula(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("formula-outline: {e}");
            process::exit(1);
        }
    };

    let config = Config::new(&table)
        .with_locale(locale)
        .with_label_mode(args.label_mode);

    let rendered = match args.output {
        Output::Inline => format_inline(&source),
        Output::Tree | Output::Html => plan_formula(&source, &config).map(|mut plan: RenderPlan| {
            if args.collapsed {
                plan.collapse_all();
            }
            if args.output == Output::Html {
                render_html(&plan)
            } else {
                render_text(&plan)
            }
        }),
    };

    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => {
            log::debug!("formatting failed: {e}");
            eprintln!("{}{}", i18n::strings(locale).error_prefix, e.localized(locale));
            process::exit(2);
        }
    }
}
