use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;

use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::format;
use crate::cli::io as cli_io;
use crate::cli::shell::parse_command_line;
use crate::config::{Config, ConfigError, ConfigManager};
use crate::core::{Clock, ExpenseStore, SystemClock};
use crate::errors::ExpenseError;
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Failures reported for a single command; the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: ExpenseStore,
    pub backend: Arc<dyn KeyValueStore>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub app_dir: PathBuf,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_app_dir(mode, paths::app_data_dir())
    }

    /// Opens the config and expense store under `app_dir`, seeding demo data when enabled.
    pub fn with_app_dir(mode: CliMode, app_dir: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(app_dir.clone())?;
        let config = config_manager.load()?;
        let backend: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::new(config.resolve_data_dir(&app_dir))?);
        let mut store = ExpenseStore::open(backend.clone(), Arc::new(SystemClock))?;
        if config.seed_demo_data && store.load_demo_if_empty()? {
            cli_io::print_info(format!("Loaded {} demo expenses.", store.len()));
        }

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            store,
            backend,
            config_manager,
            config,
            app_dir,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        format!("expenses ({})> ", self.store.len())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and runs one input line. Blank lines and `#` comments are skipped;
    /// quoting mistakes are reported as warnings.
    pub(crate) fn execute_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(ExpenseError::NotFound(id)) => {
                cli_io::print_error(ExpenseError::NotFound(id));
                cli_io::print_hint("Use `list` to see expense ids.");
            }
            other => cli_io::print_error(other),
        }
        Ok(())
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Asks for confirmation interactively. Script mode has nobody to ask and proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    pub(crate) fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn today(&self) -> chrono::NaiveDate {
        self.store.clock().today()
    }

    pub(crate) fn amount(&self, amount: rust_decimal::Decimal) -> String {
        format::format_amount(&self.config.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shell(seed: bool) -> (ShellContext, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            seed_demo_data: seed,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        let context = ShellContext::with_app_dir(CliMode::Script, temp.path().to_path_buf())
            .expect("shell context");
        (context, temp)
    }

    #[test]
    fn startup_seeds_demo_data_when_enabled() {
        let (context, _guard) = shell(true);
        assert_eq!(context.store.len(), 15);
        let (context, _guard) = shell(false);
        assert!(context.store.is_empty());
    }

    #[test]
    fn add_and_delete_through_commands() {
        let (mut context, _guard) = shell(false);
        context
            .execute_line("add \"Lunch at Chipotle\" 18.50 food 2024-01-09")
            .unwrap();
        assert_eq!(context.store.len(), 1);
        let record = context.store.list()[0].clone();
        assert_eq!(record.category, "Food");

        context
            .execute_line(&format!("delete {} --yes", record.id))
            .unwrap();
        assert!(context.store.is_empty());
    }

    #[test]
    fn edit_replaces_only_named_fields() {
        let (mut context, _guard) = shell(false);
        context
            .execute_line("add Coffee 6.50 Food 2024-01-06")
            .unwrap();
        let id = context.store.list()[0].id;
        context
            .execute_line(&format!("edit {} --amount 7.25", id))
            .unwrap();
        let record = context.store.get(id).unwrap();
        assert_eq!(record.amount, "7.25".parse().unwrap());
        assert_eq!(record.description, "Coffee");
    }

    #[test]
    fn validation_failures_surface_as_core_errors() {
        let (mut context, _guard) = shell(false);
        let err = context.execute_line("add Coffee -3 Food").unwrap_err();
        assert!(matches!(err, CommandError::Core(ExpenseError::Validation(_))));
        assert!(context.store.is_empty());
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut context, _guard) = shell(false);
        assert_eq!(context.execute_line("lsit").unwrap(), LoopControl::Continue);
        assert!(context.running);
        assert_eq!(context.execute_line("EXIT").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn comments_blanks_and_bad_quoting_are_skipped() {
        let (mut context, _guard) = shell(false);
        for line in ["", "   ", "# add Coffee 6.50 Food", "add \"Coffee 6.50 Food"] {
            assert_eq!(context.execute_line(line).unwrap(), LoopControl::Continue);
        }
        assert!(context.store.is_empty());
    }

    #[test]
    fn edit_prefills_untouched_fields_from_the_record() {
        let (mut context, _guard) = shell(false);
        context
            .execute_line("add \"Movie night\" 12.40 Entertainment 2024-02-03")
            .unwrap();
        let id = context.store.list()[0].id;
        context
            .execute_line(&format!("edit {} --category shopping --date 2024-02-04", id))
            .unwrap();
        let record = context.store.get(id).unwrap();
        assert_eq!(record.description, "Movie night");
        assert_eq!(record.amount, "12.40".parse().unwrap());
        assert_eq!(record.category, "Shopping");
        assert_eq!(record.date, chrono::NaiveDate::from_ymd_opt(2024, 2, 4).unwrap());
    }

    #[test]
    fn oversized_amount_is_rejected_and_store_reopens() {
        let (mut context, guard) = shell(false);
        let err = context
            .execute_line("add Yacht 79228162514264337593543950335 Shopping 2024-02-03")
            .unwrap_err();
        assert!(matches!(err, CommandError::Core(ExpenseError::Validation(_))));
        context.execute_line("add Coffee 6.50 Food 2024-02-03").unwrap();
        drop(context);

        let reopened = ShellContext::with_app_dir(CliMode::Script, guard.path().to_path_buf())
            .expect("store reopens");
        assert_eq!(reopened.store.len(), 1);
    }
}
