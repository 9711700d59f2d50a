use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::context::{CliError, CliMode, ShellContext};
use crate::cli::{io as cli_io, SCRIPT_ENV};

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        colored::control::set_override(false);
    }

    let mut context = ShellContext::new(mode)?;
    tracing::debug!(?mode, app_dir = %context.app_dir.display(), "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

/// Feeds lines to the context until the source runs dry or a command asks to exit.
/// `next_line` returns `None` when input ends.
fn drive<F>(context: &mut ShellContext, mut next_line: F) -> Result<(), CliError>
where
    F: FnMut(&ShellContext) -> Result<Option<String>, CliError>,
{
    while context.running {
        let Some(line) = next_line(&*context)? else {
            break;
        };
        if let Err(err) = context.execute_line(&line) {
            context.report_error(err)?;
        }
    }
    Ok(())
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    cli_io::print_info("Type `help` to see available commands.");

    drive(context, |context| match editor.readline(&context.prompt()) {
        Ok(line) => {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                editor.add_history_entry(trimmed).ok();
            }
            Ok(Some(trimmed.to_string()))
        }
        Err(ReadlineError::Interrupted) => {
            if context.confirm_exit()? {
                Ok(None)
            } else {
                Ok(Some(String::new()))
            }
        }
        Err(ReadlineError::Eof) => {
            cli_io::print_info("Exiting shell.");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    })
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let mut lines = io::stdin().lock().lines();
    drive(context, |_| lines.next().transpose().map_err(CliError::from))
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        // Only the first word is a command name.
        if prefix.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = prefix.len() - prefix.trim_start().len();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
