use std::path::PathBuf;

use crate::cli::commands::{usage_error, CommandDefinition};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output::section as output_section;
use crate::config::CONFIG_KEYS;
use crate::core::services::{demo_expenses, CsvExporter, PreferenceService};
use crate::domain::Theme;

const THEME_USAGE: &str = "theme [light|dark|toggle]";
const CONFIG_USAGE: &str = "config [set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "export",
            "Write all expenses to a CSV file",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "demo",
            "Replace all expenses with the demo set",
            "demo [--yes]",
            cmd_demo,
        ),
        CommandDefinition::new("clear", "Delete every expense", "clear [--yes]", cmd_clear),
        CommandDefinition::new("theme", "Show or change the display theme", THEME_USAGE, cmd_theme),
        CommandDefinition::new("config", "Show or change settings", CONFIG_USAGE, cmd_config),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = match args {
        [] => context.config.resolve_export_dir(),
        [path] => PathBuf::from(*path),
        _ => return Err(usage_error("export [path]")),
    };
    let written = CsvExporter::write_to_path(context.store.list(), &target, context.today())?;
    cli_io::print_success(format!(
        "Exported {} expense(s) to {}",
        context.store.len(),
        written.display()
    ));
    Ok(())
}

fn cmd_demo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let skip_confirm = match args {
        [] => false,
        ["--yes"] => true,
        _ => return Err(usage_error("demo [--yes]")),
    };
    if !context.store.is_empty()
        && !skip_confirm
        && !context.confirm("Replace all current expenses with demo data?")?
    {
        cli_io::print_info("Demo load cancelled.");
        return Ok(());
    }
    let count = context.store.replace_all(demo_expenses())?;
    cli_io::print_success(format!("Loaded {} demo expenses.", count));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let skip_confirm = match args {
        [] => false,
        ["--yes"] => true,
        _ => return Err(usage_error("clear [--yes]")),
    };
    if !skip_confirm
        && !context.confirm(
            "Are you sure you want to clear all expense data? This action cannot be undone.",
        )?
    {
        cli_io::print_info("Clear cancelled.");
        return Ok(());
    }
    context.store.clear()?;
    cli_io::print_success("All expense data cleared.");
    Ok(())
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let backend = context.backend.as_ref();
    let theme = match args {
        [] => {
            let theme = PreferenceService::theme(backend)?;
            cli_io::print_info(format!("Theme: {}", theme));
            return Ok(());
        }
        ["toggle"] => PreferenceService::toggle_theme(backend)?,
        [value] => {
            let theme = value.parse::<Theme>()?;
            PreferenceService::set_theme(backend, theme)?;
            theme
        }
        _ => return Err(usage_error(THEME_USAGE)),
    };
    cli_io::print_success(format!("Theme set to {}.", theme));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output_section("Configuration");
            for (key, value) in context.config.entries() {
                cli_io::print_info(format!("  {:<16} {}", key, value));
            }
            cli_io::print_info(format!(
                "  file             {}",
                context.config_manager.config_path().display()
            ));
            Ok(())
        }
        ["set", key, value] => {
            context.config.set_value(key, value)?;
            context.config_manager.save(&context.config)?;
            cli_io::print_success(format!("Set {} = {}.", key, value));
            if matches!(*key, "data_dir" | "seed_demo_data") {
                cli_io::print_hint("Takes effect the next time the shell starts.");
            }
            Ok(())
        }
        ["set", ..] => Err(usage_error(&format!(
            "config set <key> <value> (keys: {})",
            CONFIG_KEYS.join(", ")
        ))),
        _ => Err(usage_error(CONFIG_USAGE)),
    }
}
