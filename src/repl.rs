use std::io::{self, BufRead, Write};

use crate::config::{Config, LabelMode, Locale};
use crate::error::FormulaError;
use crate::format::{RenderPlan, parse_formula, plan_formula, render_html, render_text, to_inline};
use crate::i18n;
use crate::labels::LabelTable;

/// What the loop should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Print(String),
    /// Goes to stderr.
    Error(String),
    Quit,
}

/// Interactive state: the language, label mode and last rendered formula.
///
/// Any line that is not a `:` command is taken as a new formula and runs
/// the full pipeline from scratch. Changing the language or label mode
/// re-renders the current formula, which resets the fold state.
///
/// Commands:
///   :q / :quit        exit
///   :lang ja|en       switch message and generic label language
///   :labels MODE      auto, ja1, ja2, en or off
///   :blocks           list call blocks with their ids
///   :fold N / :unfold N / :toggle N
///   :collapse / :expand   every block at once
///   :header           click the header line (re-expands the root)
///   :inline / :html   show the current formula in another form
pub struct Session<'a> {
    table: &'a LabelTable,
    locale: Locale,
    label_mode: LabelMode,
    source: Option<String>,
    plan: Option<RenderPlan>,
}

impl<'a> Session<'a> {
    pub fn new(table: &'a LabelTable, locale: Locale, label_mode: LabelMode) -> Self {
        Session {
            table,
            locale,
            label_mode,
            source: None,
            plan: None,
        }
    }

    fn config(&self) -> Config<'a> {
        Config::new(self.table)
            .with_locale(self.locale)
            .with_label_mode(self.label_mode)
    }

    pub fn handle(&mut self, line: &str) -> Step {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix(':') else {
            self.source = Some(trimmed.to_string());
            return self.render_source();
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (command, ""),
        };

        match name {
            "q" | "quit" => Step::Quit,
            "lang" => match arg.parse::<Locale>() {
                Ok(locale) => {
                    self.locale = locale;
                    self.rerender(format!("(language: {})", locale.as_str()))
                }
                Err(e) => Step::Error(e),
            },
            "labels" => match arg.parse::<LabelMode>() {
                Ok(mode) => {
                    self.label_mode = mode;
                    self.rerender(format!(
                        "{} {}",
                        i18n::strings(self.locale).label_mode_caption,
                        mode.as_str()
                    ))
                }
                Err(e) => Step::Error(e),
            },
            "blocks" => self.with_plan(|plan| {
                let mut out = String::new();
                for b in plan.blocks() {
                    let state = if b.open { "open" } else { "closed" };
                    out.push_str(&format!(
                        "{:>3}  {}{}  ({state})\n",
                        b.id,
                        "  ".repeat(b.depth),
                        b.name
                    ));
                }
                if out.is_empty() {
                    out.push_str("(no function blocks)\n");
                }
                out.pop();
                Step::Print(out)
            }),
            "fold" | "unfold" | "toggle" => {
                let Ok(id) = arg.parse::<usize>() else {
                    return Step::Error(format!(":{name} needs a block number (see :blocks)"));
                };
                self.with_plan(|plan| {
                    let found = match name {
                        "fold" => plan.set_open(id, false),
                        "unfold" => plan.set_open(id, true),
                        _ => plan.toggle(id).is_some(),
                    };
                    if found {
                        Step::Print(render_text(plan))
                    } else {
                        Step::Error(format!("no block {id}"))
                    }
                })
            }
            "collapse" => self.with_plan(|plan| {
                plan.collapse_all();
                Step::Print(render_text(plan))
            }),
            "expand" => self.with_plan(|plan| {
                plan.expand_all();
                Step::Print(render_text(plan))
            }),
            "header" => self.with_plan(|plan| {
                plan.click_header();
                Step::Print(render_text(plan))
            }),
            "html" => self.with_plan(|plan| Step::Print(render_html(plan))),
            "inline" => match self.source.as_deref().map(parse_formula) {
                Some(Ok(expr)) => Step::Print(to_inline(&expr)),
                Some(Err(e)) => self.formula_error(&e),
                None => Step::Error("(no formula yet)".to_string()),
            },
            _ => Step::Error(format!("unknown command: :{name}")),
        }
    }

    fn render_source(&mut self) -> Step {
        let Some(source) = self.source.as_deref() else {
            return Step::Error("(no formula yet)".to_string());
        };
        let config = self.config();
        match plan_formula(source, &config) {
            Ok(plan) => {
                let text = render_text(&plan);
                self.plan = Some(plan);
                Step::Print(text)
            }
            Err(e) => {
                self.plan = None;
                self.formula_error(&e)
            }
        }
    }

    fn formula_error(&self, e: &FormulaError) -> Step {
        Step::Error(format!(
            "{}{}",
            i18n::strings(self.locale).error_prefix,
            e.localized(self.locale)
        ))
    }

    fn rerender(&mut self, note: String) -> Step {
        if self.source.is_none() {
            return Step::Print(note);
        }
        self.render_source()
    }

    fn with_plan(&mut self, f: impl FnOnce(&mut RenderPlan) -> Step) -> Step {
        match self.plan.as_mut() {
            Some(plan) => f(plan),
            None => Step::Error("(no formula yet)".to_string()),
        }
    }
}

/// Run an interactive session on stdin until EOF or `:q`.
pub fn run(session: &mut Session) {
    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        print!("fx> ");
        if let Err(e) = io::stdout().flush() {
            log::debug!("cannot flush prompt: {e}");
        }

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("formula-outline: read error: {e}");
                break;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match session.handle(&line) {
            Step::Print(out) => println!("{out}"),
            Step::Error(msg) => eprintln!("{msg}"),
            Step::Quit => break,
        }
    }
}
