use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use budgetrule::config::AppConfig;
use budgetrule::db::SqliteStore;
use budgetrule::engine::{classify, index_categories, RuleEditor};
use budgetrule::format::{format_amount, format_delta, truncate};
use budgetrule::models::{
    parse_date, AllocationRule, Category, Operation, OperationType, Period, Segment, YearMonth,
};
use budgetrule::report;
use budgetrule::store::FinanceStore;

pub(crate) fn as_cli(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];
    match command.as_str() {
        "summary" | "s" => cli_summary(rest, store, config),
        "trend" => cli_trend(rest, store, config),
        "rule" => cli_rule(rest, store, config),
        "ops" => cli_ops(rest, store, config),
        "add" => cli_add(rest, store, config),
        "edit" => cli_edit(rest, store, config),
        "rm" => cli_rm(rest, store, config),
        "categories" => cli_categories(store, config),
        "category" => cli_category(rest, store, config),
        "export" => cli_export(rest, store, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetrule {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("BudgetRule: 50/30/20 budgeting for your income, expenses and savings");
    println!();
    println!("Usage: budgetrule [--config <file>] <command>");
    println!();
    println!("Commands:");
    println!("  summary [YYYY-MM]                     Totals and planned vs actual for a month");
    println!("  trend [months]                        Monthly totals for recent months (default 6)");
    println!("  rule                                  Show the allocation rule");
    println!("  rule set <needs> <wants> <savings>    Change the allocation rule (must add up to 100)");
    println!("  ops [YYYY-MM]                         List operations for a month");
    println!("    --type <income|expense|savings>     Only one type");
    println!("  add <type> <amount> <concept>         Record an operation");
    println!("    --date <YYYY-MM-DD>                 Date (default: today)");
    println!("    --category <name>                   Category");
    println!("    --note <text>                       Description");
    println!("  edit <id>                             Change an operation");
    println!("    --type, --amount, --concept, --date, --category (or 'none'), --note");
    println!("  rm <id>                               Delete an operation permanently");
    println!("  categories                            List categories");
    println!("  category add <name> <type> [segment]  Create a category");
    println!("  category rm <name>                    Delete a category");
    println!("  export [path]                         Export operations to CSV");
    println!("    --month <YYYY-MM>                   Month to export (default: current)");
    println!("  --help, -h                            Show this help");
    println!("  --version, -V                         Show version");
}

// ── Argument helpers ──────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither `--flag`s nor their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn month_arg(arg: Option<&str>) -> Result<YearMonth> {
    match arg {
        Some(m) => Ok(YearMonth::parse(m)?),
        None => Ok(YearMonth::from_date(today())),
    }
}

fn parse_amount(s: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim()).with_context(|| format!("Invalid amount '{s}'"))
}

fn parse_type(s: &str) -> Result<OperationType> {
    OperationType::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid type '{s}', expected income, expense or savings"))
}

fn parse_percent(s: &str) -> Result<u8> {
    let value: u8 = s
        .parse()
        .with_context(|| format!("Invalid percentage '{s}'"))?;
    if value > 100 {
        anyhow::bail!("Percentage {value} is above 100");
    }
    Ok(value)
}

fn find_category(categories: &[Category], name: &str) -> Result<Category> {
    Category::find_by_name(categories, name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Category '{name}' not found"))
}

// ── Reports ───────────────────────────────────────────────────

fn cli_summary(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let month = month_arg(positionals(args).first().copied())?;
    let summary = report::summarize(store, &config.user, Period::month(month))?;
    let display = &config.display;
    let totals = &summary.totals;

    println!("BudgetRule {month} (rule {})", summary.rule);
    println!("{}", "─".repeat(48));
    println!("  Income:      {}", format_amount(totals.income_total, display));
    println!("  Expenses:    {}", format_amount(totals.expense_total, display));
    println!("  Savings:     {}", format_amount(totals.savings_total, display));
    println!("  Net:         {}", format_amount(totals.net(), display));
    println!("  Operations:  {}", summary.operation_count);
    println!();
    println!(
        "  {:<9} {:>5} {:>14} {:>14} {:>8}",
        "Segment", "Rule", "Planned", "Actual", "Delta"
    );
    for seg in summary.evaluation.iter() {
        println!(
            "  {:<9} {:>4}% {:>14} {:>14} {:>8}",
            seg.segment.as_str(),
            seg.percent,
            format_amount(seg.planned, display),
            format_amount(seg.actual, display),
            format_delta(seg.delta_percent),
        );
    }

    let unclassified_expense = totals.unclassified(OperationType::Expense);
    let unclassified_savings = totals.unclassified(OperationType::Savings);
    if !unclassified_expense.is_zero() || !unclassified_savings.is_zero() {
        println!();
        println!(
            "  Not in any segment: {} expenses, {} savings",
            format_amount(unclassified_expense, display),
            format_amount(unclassified_savings, display),
        );
    }
    if !summary.validation.is_valid {
        println!();
        println!(
            "  Warning: rule adds up to {}% ({:+} points to reach 100%)",
            summary.validation.total, summary.validation.delta
        );
    }
    for cat in &summary.inconsistent_categories {
        println!(
            "  Warning: category '{}' is {} but tagged {}",
            cat.name,
            cat.kind,
            cat.segment.map(|s| s.as_str()).unwrap_or("-")
        );
    }
    Ok(())
}

fn cli_trend(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let months: u32 = match positionals(args).first() {
        Some(n) => n.parse().with_context(|| format!("Invalid month count '{n}'"))?,
        None => 6,
    };
    if months == 0 {
        anyhow::bail!("Month count must be at least 1");
    }
    let to = YearMonth::from_date(today());
    let from = (1..months).fold(to, |m, _| m.prev());
    let trend = report::monthly_trend(store, &config.user, from, to)?;
    let display = &config.display;

    println!(
        "{:<8} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Income", "Expenses", "Savings", "Net"
    );
    println!("{}", "─".repeat(68));
    for (month, totals) in &trend {
        println!(
            "{:<8} {:>14} {:>14} {:>14} {:>14}",
            month.to_string(),
            format_amount(totals.income_total, display),
            format_amount(totals.expense_total, display),
            format_amount(totals.savings_total, display),
            format_amount(totals.net(), display),
        );
    }
    Ok(())
}

// ── Allocation rule ───────────────────────────────────────────

fn cli_rule(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let mut editor = RuleEditor::load(store, &config.user)?;
    let pos = positionals(args);
    match pos.as_slice() {
        [] | ["show"] => {
            let rule = editor.rule();
            let v = editor.validation();
            println!("Needs:    {:>3}%", rule.needs_percent);
            println!("Wants:    {:>3}%", rule.wants_percent);
            println!("Savings:  {:>3}%", rule.savings_percent);
            if v.is_valid {
                println!("Total:    {:>3}%", v.total);
            } else {
                println!("Total:    {:>3}%  (invalid, {:+} points to reach 100%)", v.total, v.delta);
            }
            Ok(())
        }
        ["set", needs, wants, savings] => {
            let rule = AllocationRule::new(
                parse_percent(needs)?,
                parse_percent(wants)?,
                parse_percent(savings)?,
            );
            editor.set_rule(rule);
            if !editor.is_dirty() {
                println!("Rule is already {rule}");
                return Ok(());
            }
            editor.save(store)?;
            println!("Rule set to {rule}");
            Ok(())
        }
        _ => anyhow::bail!("Usage: budgetrule rule [set <needs> <wants> <savings>]"),
    }
}

// ── Operations ────────────────────────────────────────────────

fn cli_ops(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let month = month_arg(positionals(args).first().copied())?;
    let kind = flag(args, "--type").map(parse_type).transpose()?;
    let period = Period::month(month);
    let ops = store.fetch_operations(&config.user, period.start, period.end, kind)?;
    if ops.is_empty() {
        println!("No operations for {month}");
        return Ok(());
    }
    let categories = index_categories(&store.fetch_categories(&config.user)?);

    println!(
        "{:<6} {:<10} {:<8} {:>14} {:<18} {:<7} Concept",
        "ID", "Date", "Type", "Amount", "Category", "Segment"
    );
    println!("{}", "─".repeat(80));
    for op in &ops {
        let category = op.category_id.and_then(|id| categories.get(&id));
        println!(
            "{:<6} {:<10} {:<8} {:>14} {:<18} {:<7} {}",
            op.id.unwrap_or(0),
            op.date.to_string(),
            op.kind.as_str(),
            format_amount(op.amount, &config.display),
            truncate(category.map(|c| c.name.as_str()).unwrap_or("-"), 18),
            classify(op, &categories).map(|s| s.as_str()).unwrap_or("-"),
            truncate(&op.concept, 30),
        );
    }
    Ok(())
}

fn cli_add(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let pos = positionals(args);
    let [kind, amount, concept @ ..] = pos.as_slice() else {
        anyhow::bail!("Usage: budgetrule add <type> <amount> <concept> [--date D] [--category NAME] [--note TEXT]");
    };
    if concept.is_empty() {
        anyhow::bail!("Missing concept for the operation");
    }
    let kind = parse_type(kind)?;
    let date = match flag(args, "--date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let mut op = Operation::new(kind, parse_amount(amount)?, concept.join(" "), date);
    if let Some(note) = flag(args, "--note") {
        op = op.with_description(note.to_string());
    }
    if let Some(name) = flag(args, "--category") {
        let categories = store.fetch_categories(&config.user)?;
        if let Some(id) = find_category(&categories, name)?.id {
            op = op.with_category(id);
        }
        warn_if_mismatched(&categories, &op);
    }
    let id = store.insert_operation(&config.user, &op)?;
    println!(
        "Added {} #{id}: {} {}",
        op.kind,
        format_amount(op.amount, &config.display),
        op.concept
    );
    Ok(())
}

fn cli_edit(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "edit <id> [--amount A] ...")?;
    let mut op = store
        .get_operation(&config.user, id)?
        .ok_or_else(|| anyhow::anyhow!("Operation {id} not found"))?;

    if let Some(t) = flag(args, "--type") {
        op.kind = parse_type(t)?;
    }
    if let Some(a) = flag(args, "--amount") {
        op.amount = parse_amount(a)?;
    }
    if let Some(c) = flag(args, "--concept") {
        op.concept = c.to_string();
    }
    if let Some(d) = flag(args, "--date") {
        op.date = parse_date(d)?;
    }
    if let Some(n) = flag(args, "--note") {
        op.description = if n.is_empty() { None } else { Some(n.to_string()) };
    }
    let categories = store.fetch_categories(&config.user)?;
    match flag(args, "--category") {
        Some("none") => op.category_id = None,
        Some(name) => op.category_id = find_category(&categories, name)?.id,
        None => {}
    }
    if flag(args, "--type").is_some() || flag(args, "--category").is_some() {
        warn_if_mismatched(&categories, &op);
    }

    store.update_operation(&config.user, id, &op)?;
    println!("Updated operation #{id}");
    Ok(())
}

fn cli_rm(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "rm <id>")?;
    store.delete_operation(&config.user, id)?;
    println!("Deleted operation #{id}");
    Ok(())
}

/// The operation's category, when its type differs from the operation's.
fn mismatched_category<'a>(categories: &'a [Category], op: &Operation) -> Option<&'a Category> {
    let category = Category::find_by_id(categories, op.category_id?)?;
    (category.kind != op.kind).then_some(category)
}

fn warn_if_mismatched(categories: &[Category], op: &Operation) {
    if let Some(category) = mismatched_category(categories, op) {
        tracing::warn!(
            category = %category.name,
            category_type = %category.kind,
            operation_type = %op.kind,
            "category type differs from operation type"
        );
    }
}

fn parse_id(arg: Option<&str>, usage: &str) -> Result<i64> {
    let Some(s) = arg else {
        anyhow::bail!("Usage: budgetrule {usage}");
    };
    s.parse().with_context(|| format!("Invalid id '{s}'"))
}

// ── Categories ────────────────────────────────────────────────

fn cli_categories(store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let categories = store.fetch_categories(&config.user)?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }
    println!("{:<4} {:<24} {:<8} Segment", "ID", "Name", "Type");
    println!("{}", "─".repeat(48));
    for cat in &categories {
        let segment = cat.segment.map(|s| s.as_str()).unwrap_or("-");
        let marker = if cat.is_consistent() { "" } else { "  (inconsistent)" };
        println!(
            "{:<4} {:<24} {:<8} {segment}{marker}",
            cat.id.unwrap_or(0),
            truncate(&cat.name, 24),
            cat.kind.as_str(),
        );
    }
    Ok(())
}

fn cli_category(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let pos = positionals(args);
    match pos.as_slice() {
        ["add", name, kind, rest @ ..] => {
            let mut category = Category::new(name.to_string(), parse_type(kind)?);
            if let Some(seg) = rest.first() {
                let segment = Segment::parse(seg).ok_or_else(|| {
                    anyhow::anyhow!("Invalid segment '{seg}', expected needs, wants or savings")
                })?;
                category = category.with_segment(segment);
            }
            if !category.is_consistent() {
                println!(
                    "Note: a {} category tagged {} is left out of segment totals",
                    category.kind,
                    category.segment.map(|s| s.as_str()).unwrap_or("-")
                );
            }
            let id = store
                .insert_category(&config.user, &category)
                .with_context(|| format!("Failed to add category '{name}'"))?;
            println!("Added category '{name}' (#{id})");
            Ok(())
        }
        ["rm", name] => {
            let categories = store.fetch_categories(&config.user)?;
            let category = find_category(&categories, name)?;
            if let Some(id) = category.id {
                store.delete_category(&config.user, id)?;
            }
            println!("Removed category '{}'", category.name);
            Ok(())
        }
        _ => anyhow::bail!("Usage: budgetrule category add <name> <type> [segment] | category rm <name>"),
    }
}

// ── Export ────────────────────────────────────────────────────

fn cli_export(args: &[String], store: &SqliteStore, config: &AppConfig) -> Result<()> {
    let month = month_arg(flag(args, "--month"))?;
    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/budgetrule-export-{month}.csv")
        });

    let period = Period::month(month);
    let ops = store.fetch_operations(&config.user, period.start, period.end, None)?;
    if ops.is_empty() {
        println!("No operations for {month}");
        return Ok(());
    }
    let categories = index_categories(&store.fetch_categories(&config.user)?);
    write_csv(&output_path, &ops, &categories)
        .with_context(|| format!("Failed to write {output_path}"))?;
    println!("Exported {} operations to {output_path}", ops.len());
    Ok(())
}

fn write_csv(path: &str, ops: &[Operation], categories: &HashMap<i64, Category>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "id",
        "date",
        "type",
        "amount",
        "concept",
        "description",
        "category",
        "segment",
    ])?;
    for op in ops {
        let category = op.category_id.and_then(|id| categories.get(&id));
        wtr.write_record([
            op.id.unwrap_or(0).to_string(),
            op.date.to_string(),
            op.kind.as_str().to_string(),
            op.amount.to_string(),
            op.concept.clone(),
            op.description.clone().unwrap_or_default(),
            category.map(|c| c.name.clone()).unwrap_or_default(),
            classify(op, categories)
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
