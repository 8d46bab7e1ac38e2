use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;

use crate::action::{Action, NUM_ACTIONS};
use crate::regret::RoundRegret;

const UNIFORM_PCT: f64 = 100.0 / NUM_ACTIONS as f64;

/// Color a percentage by its distance from uniform play.
fn styled_pct(pct: f64) -> String {
    let text = format!("{:.2}%", pct);
    let gap = (pct - UNIFORM_PCT).abs();
    if gap < 1.0 {
        text.green().to_string()
    } else if gap < 5.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// One row per labelled strategy, columns in canonical action order.
pub fn strategy_table(rows: &[(String, [f64; NUM_ACTIONS])], title: &str) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    for action in Action::ALL {
        header.push(Cell::new(action.as_str()).set_alignment(CellAlignment::Right));
    }
    table.set_header(header);

    for (label, pct) in rows {
        let mut row = vec![Cell::new(label.bold().to_string())];
        for action in Action::ALL {
            row.push(
                Cell::new(styled_pct(pct[action.index()])).set_alignment(CellAlignment::Right),
            );
        }
        table.add_row(row);
    }

    format!("  {}\n{}", title.bold(), table)
}

/// The utility of each row action against each column action.
pub fn payoff_table() -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    for action in Action::ALL {
        header.push(Cell::new(action.as_str()).set_alignment(CellAlignment::Center));
    }
    table.set_header(header);

    for (row_action, cells) in &Action::ALL
        .iter()
        .cartesian_product(Action::ALL.iter())
        .chunk_by(|(row, _)| **row)
    {
        let mut row = vec![Cell::new(row_action.as_str().bold().to_string())];
        for (a, b) in cells {
            let u = a.utility(*b);
            let text = match u {
                1 => "+1".green().bold().to_string(),
                -1 => "-1".red().bold().to_string(),
                _ => "0".dimmed().to_string(),
            };
            row.push(Cell::new(text).set_alignment(CellAlignment::Center));
        }
        table.add_row(row);
    }

    table.to_string()
}

/// Regret of each candidate action, positive regret highlighted.
pub fn regret_table(regrets: &RoundRegret) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Action").set_alignment(CellAlignment::Left),
        Cell::new("Regret").set_alignment(CellAlignment::Right),
    ]);

    for action in Action::ALL {
        let r = regrets[action];
        let text = format!("{:+.0}", r);
        let styled = if r > 0.0 {
            text.green().bold().to_string()
        } else if r < 0.0 {
            text.red().to_string()
        } else {
            text.dimmed().to_string()
        };
        table.add_row(vec![
            Cell::new(action.as_str().bold().to_string()),
            Cell::new(styled).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payoff_table_lists_every_action() {
        colored::control::set_override(false);
        let table = payoff_table();
        for action in Action::ALL {
            assert!(table.contains(action.as_str()));
        }
        assert_eq!(table.matches("+1").count(), 3);
        assert_eq!(table.matches("-1").count(), 3);
    }

    #[test]
    fn regret_table_signs() {
        colored::control::set_override(false);
        let table = regret_table(&RoundRegret::new(0.0, 1.0, -2.0));
        assert!(table.contains("+1"));
        assert!(table.contains("-2"));
        assert!(table.contains("+0"));
    }

    #[test]
    fn strategy_table_formats_two_decimals() {
        colored::control::set_override(false);
        let rows = vec![("Player one".to_string(), [40.0, 30.0, 30.0])];
        let table = strategy_table(&rows, "Start");
        assert!(table.contains("Player one"));
        assert!(table.contains("40.00%"));
        assert!(table.contains("30.00%"));
    }
}
