use chrono::Datelike;

use crate::cli::commands::{usage_error, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format::format_share;
use crate::cli::io as cli_io;
use crate::cli::output::section as output_section;
use crate::cli::ui::{Table, TableColumn};
use crate::core::services::{AggregationEngine, MONTH_LABELS};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "summary",
            "Show totals for all time and this month",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "breakdown",
            "Show spending per category",
            "breakdown",
            cmd_breakdown,
        ),
        CommandDefinition::new(
            "trend",
            "Show month-by-month totals for a year",
            "trend [year]",
            cmd_trend,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("summary"));
    }
    let summary = AggregationEngine::summarize(context.store.list(), context.today())?;
    output_section("Summary");
    cli_io::print_info(format!("  Total spent : {}", context.amount(summary.total)));
    cli_io::print_info(format!(
        "  This month  : {}",
        context.amount(summary.current_month)
    ));
    cli_io::print_info(format!("  Categories  : {}", summary.category_count));
    cli_io::print_info(format!("  Expenses    : {}", summary.expense_count));
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("breakdown"));
    }
    let snapshot = context.store.list();
    let breakdown = AggregationEngine::category_breakdown(snapshot)?;
    if breakdown.is_empty() {
        cli_io::print_info("No expenses found");
        return Ok(());
    }
    let shares = AggregationEngine::category_shares(snapshot)?;

    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
    ]);
    for (category, amount) in &breakdown {
        let share = shares.get(category).copied().unwrap_or_default();
        table.push_row(vec![
            category.clone(),
            context.amount(*amount),
            format_share(share),
        ]);
    }
    output_section("Spending by category");
    cli_io::print_info(table.render());
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let year = match args {
        [] => context.today().year(),
        [raw] => raw.parse::<i32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a valid year", raw))
        })?,
        _ => return Err(usage_error("trend [year]")),
    };

    let months = AggregationEngine::monthly_trend(context.store.list(), year)?;
    let mut table = Table::new(vec![TableColumn::left("Month"), TableColumn::right("Amount")]);
    for (label, amount) in MONTH_LABELS.iter().zip(months.iter()) {
        table.push_row(vec![label.to_string(), context.amount(*amount)]);
    }
    output_section(format!("Monthly spending {}", year));
    cli_io::print_info(table.render());
    Ok(())
}
