use chrono::NaiveDate;

use crate::cli::commands::{parse_id, usage_error, CommandDefinition, ParsedArgs};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format::format_date;
use crate::cli::io as cli_io;
use crate::cli::ui::{Table, TableColumn};
use crate::core::services::{AggregationEngine, ExpenseFilter};
use crate::domain::{canonical_category, ExpenseInput, ExpenseRecord, STANDARD_CATEGORIES};
use crate::errors::ExpenseError;

const ADD_USAGE: &str = "add <description> <amount> <category> [YYYY-MM-DD]";
const LIST_USAGE: &str = "list [--category <name>] [--date <YYYY-MM-DD>]";
const EDIT_USAGE: &str =
    "edit <id> [--description <text>] [--amount <value>] [--category <name>] [--date <YYYY-MM-DD>]";
const DELETE_USAGE: &str = "delete <id> [--yes]";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("add", "Record a new expense", ADD_USAGE, cmd_add),
        CommandDefinition::new("list", "List expenses, newest first", LIST_USAGE, cmd_list),
        CommandDefinition::new("show", "Show one expense", "show <id>", cmd_show),
        CommandDefinition::new("edit", "Change an existing expense", EDIT_USAGE, cmd_edit),
        CommandDefinition::new("delete", "Delete an expense", DELETE_USAGE, cmd_delete),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today().format(DATE_FORMAT).to_string();
    let fields: [String; 4] = match args {
        [description, amount, category] => [
            description.to_string(),
            amount.to_string(),
            category.to_string(),
            today,
        ],
        [description, amount, category, date] => [
            description.to_string(),
            amount.to_string(),
            category.to_string(),
            date.to_string(),
        ],
        [] if context.is_interactive() => prompt_fields(context, None)?,
        _ => return Err(usage_error(ADD_USAGE)),
    };
    let [description, amount, category, date] = fields;

    let input = ExpenseInput::parse(
        &description,
        &amount,
        &canonical_category(&category),
        &date,
    )?;
    let record = context.store.add(input)?;
    cli_io::print_success(format!(
        "Added expense {}: {} ({})",
        record.id,
        record.description,
        context.amount(record.amount)
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["--category", "--date"], &[])?;
    if !parsed.positional.is_empty() {
        return Err(usage_error(LIST_USAGE));
    }
    let mut filter = ExpenseFilter::new();
    if let Some(category) = parsed.option("--category") {
        filter = filter.category(canonical_category(category));
    }
    if let Some(date) = parsed.option("--date") {
        filter = filter.date(parse_date(date)?);
    }

    let expenses = AggregationEngine::filter_by(context.store.list(), &filter);
    if expenses.is_empty() {
        cli_io::print_info("No expenses found");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Description").max_width(40),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
    ]);
    for expense in &expenses {
        table.push_row(vec![
            expense.id.to_string(),
            format_date(expense.date),
            expense.description.clone(),
            expense.category.clone(),
            context.amount(expense.amount),
        ]);
    }
    let total = AggregationEngine::total_amount(expenses.iter().copied())?;
    cli_io::print_info(table.render());
    cli_io::print_info(format!(
        "{} expense(s), total {}",
        expenses.len(),
        context.amount(total)
    ));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("show <id>"));
    };
    let id = parse_id(raw)?;
    let record = context
        .store
        .get(id)
        .ok_or(ExpenseError::NotFound(id))?;
    print_record(context, record);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(
        args,
        &["--description", "--amount", "--category", "--date"],
        &[],
    )?;
    let [raw] = parsed.positional.as_slice() else {
        return Err(usage_error(EDIT_USAGE));
    };
    let id = parse_id(raw)?;
    let current = context
        .store
        .get(id)
        .map(ExpenseRecord::to_input)
        .ok_or(ExpenseError::NotFound(id))?;
    let defaults = form_fields(&current);

    let [description, amount, category, date] = if parsed.has_options() {
        let mut fields = defaults;
        for (slot, option) in fields
            .iter_mut()
            .zip(["--description", "--amount", "--category", "--date"])
        {
            if let Some(value) = parsed.option(option) {
                *slot = value.to_string();
            }
        }
        fields
    } else if context.is_interactive() {
        prompt_fields(context, Some(defaults))?
    } else {
        return Err(usage_error(EDIT_USAGE));
    };

    let input = ExpenseInput::parse(
        &description,
        &amount,
        &canonical_category(&category),
        &date,
    )?;
    let record = context.store.update(id, input)?;
    cli_io::print_success(format!("Updated expense {}.", record.id));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["--yes"])?;
    let [raw] = parsed.positional.as_slice() else {
        return Err(usage_error(DELETE_USAGE));
    };
    let id = parse_id(raw)?;
    let Some(record) = context.store.get(id) else {
        return Err(ExpenseError::NotFound(id).into());
    };
    let prompt = format!("Delete `{}` ({})?", record.description, context.amount(record.amount));
    if !parsed.switch("--yes") && !context.confirm(&prompt)? {
        cli_io::print_info("Delete cancelled.");
        return Ok(());
    }
    let removed = context.store.remove(id)?;
    cli_io::print_success(format!("Deleted expense {}: {}", removed.id, removed.description));
    Ok(())
}

fn print_record(context: &ShellContext, record: &ExpenseRecord) {
    cli_io::print_info(format!("  ID          : {}", record.id));
    cli_io::print_info(format!("  Description : {}", record.description));
    cli_io::print_info(format!("  Amount      : {}", context.amount(record.amount)));
    cli_io::print_info(format!("  Category    : {}", record.category));
    cli_io::print_info(format!("  Date        : {}", format_date(record.date)));
    cli_io::print_info(format!(
        "  Recorded    : {}",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
}

/// Form text for each editable field, in prompt order.
fn form_fields(input: &ExpenseInput) -> [String; 4] {
    [
        input.description.clone(),
        input.amount.normalize().to_string(),
        input.category.clone(),
        input.date.format(DATE_FORMAT).to_string(),
    ]
}

/// Prompts for every field, prefilled from `defaults` when editing.
fn prompt_fields(
    context: &ShellContext,
    defaults: Option<[String; 4]>,
) -> Result<[String; 4], CommandError> {
    let today = context.today().format(DATE_FORMAT).to_string();
    let [description, amount, category, date] =
        defaults.unwrap_or_else(|| [String::new(), String::new(), String::new(), today]);
    let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());

    let description =
        cli_io::prompt_text(&context.theme, "Description", non_empty(&description).as_deref())?;
    let amount = cli_io::prompt_text(&context.theme, "Amount", non_empty(&amount).as_deref())?;
    cli_io::print_hint(format!("Categories: {}", STANDARD_CATEGORIES.join(", ")));
    let category = cli_io::prompt_text(&context.theme, "Category", non_empty(&category).as_deref())?;
    let date = cli_io::prompt_text(&context.theme, "Date (YYYY-MM-DD)", Some(&date))?;
    Ok([description, amount, category, date])
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", raw))
    })
}
