use std::collections::HashMap;

pub mod data;
pub mod expense;
pub mod report;
pub mod system;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::domain::ExpenseId;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(report::definitions());
    commands.extend(data::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional arguments plus `--option value` pairs and bare `--switch` flags.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`. Anything starting with `--` must be a known option or switch.
    pub fn parse(
        args: &[&'a str],
        options: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") {
                parsed.positional.push(arg);
            } else if options.contains(&arg) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{}` needs a value", arg))
                })?;
                parsed.options.push((arg, value));
            } else if switches.contains(&arg) {
                parsed.switches.push(arg);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    arg
                )));
            }
        }
        Ok(parsed)
    }

    /// Last value given for `name`.
    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

pub(crate) fn parse_id(raw: &str) -> Result<ExpenseId, CommandError> {
    raw.parse::<ExpenseId>().map_err(CommandError::from)
}
