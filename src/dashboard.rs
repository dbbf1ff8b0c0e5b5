use anyhow::Result;
use colored::*;

use crate::aggregate;
use crate::categories::{Category, MetricKind};
use crate::reshape::reshape;
use crate::table::Table;
use crate::utils::{format_date_for_display, format_number, NumberFormatOptions};

const BAR_WIDTH: usize = 40;

const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

/// Render the full dashboard: overall metrics, filtered metrics, and one
/// trend section per metric kind.
pub fn render(
    table: &Table,
    selected: &[&'static Category],
    kinds: &[MetricKind],
    format_options: &NumberFormatOptions,
) -> Result<()> {
    println!();
    println!("{}", "AI IVR DASHBOARD".cyan().bold());
    println!("{}", "================".cyan().bold());
    println!();

    let total_sessions = aggregate::sum(table, "overall_sessions")?;
    let total_messages = aggregate::sum(table, "overall_messages")?;

    println!("{}", "Overall Metrics".bold());
    println!(
        "  {:<28} {}",
        "Total Sessions:",
        format_number(total_sessions, format_options).bright_blue().bold()
    );
    println!(
        "  {:<28} {}",
        "Total Messages:",
        format_number(total_messages, format_options).bright_blue().bold()
    );
    println!();

    // The date filter was dropped upstream, so the filtered totals cover
    // all dates and match the overall ones.
    println!("{}", "Filtered Overall Metrics".bold());
    println!(
        "  {:<28} {}",
        "Total Sessions (Filtered):",
        format_number(total_sessions, format_options).bright_blue().bold()
    );
    println!(
        "  {:<28} {}",
        "Total Messages (Filtered):",
        format_number(total_messages, format_options).bright_blue().bold()
    );
    println!();

    for kind in kinds {
        render_trend_section(table, selected, *kind, format_options)?;
    }

    Ok(())
}

fn render_trend_section(
    table: &Table,
    selected: &[&'static Category],
    kind: MetricKind,
    format_options: &NumberFormatOptions,
) -> Result<()> {
    println!(
        "{}",
        format!("Daily Intent-wise {}", kind.display_name()).bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    if selected.is_empty() {
        println!("{}", "Please select at least one category.".yellow());
        println!();
        return Ok(());
    }

    let records = reshape(table, selected, kind)?;
    if records.is_empty() {
        println!("{}", "No data to display.".dimmed());
        println!();
        return Ok(());
    }

    // The batch maximum is the headroom record, so bars are scaled to
    // 105% of the observed peak exactly as the original chart axis was.
    let scale = records.iter().map(|r| r.value).fold(0.0, f64::max);
    let real = &records[..records.len() - 2];

    for (i, category) in selected.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        println!("  {}", category.label.color(color).bold());

        for record in real.iter().filter(|r| r.intent == category.label) {
            println!(
                "    {:<12} {} {}",
                format_date_for_display(record.date),
                bar(record.value, scale).color(color),
                format_number(record.value as u64, format_options).dimmed()
            );
        }
        println!();
    }

    Ok(())
}

fn bar(value: f64, scale: f64) -> String {
    let width = if scale > 0.0 {
        ((value / scale) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "█".repeat(width.min(BAR_WIDTH))
}
