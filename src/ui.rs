//! Terminal presentation: record table, detail view, menu, styled lines

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use crate::constants::DATE_TIME_FORMAT;
use crate::curl::render_curl;
use crate::models::{RecordDetail, RecordSummary};
use crate::storage::RecordStore;

/// Display payload for one record's detail view.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub full_url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Replay command rendered from the fields above
    pub command: String,
}

impl DetailView {
    pub fn from_detail(detail: RecordDetail) -> Self {
        let command = render_curl(
            &detail.method,
            &detail.full_url,
            &detail.headers,
            detail.body.as_deref(),
        );
        DetailView {
            full_url: detail.full_url,
            method: detail.method,
            headers: detail.headers,
            body: detail.body,
            command,
        }
    }
}

/// Load a record and build its display payload. `None` means the token is
/// unknown; the caller renders the error line and carries on.
pub fn present(store: &RecordStore, token: &str) -> Result<Option<DetailView>> {
    Ok(store.load(token)?.map(DetailView::from_detail))
}

pub fn print_detail(view: &DetailView) {
    section("Request Details");
    println!("{}: {}", "URL".green(), view.full_url);
    println!("{}: {}", "Method".green(), view.method);
    println!("{}:", "Headers".green());
    for (name, value) in &view.headers {
        println!("- {}: {}", name.yellow(), value);
    }

    section("Request Body");
    println!(
        "{}: {}",
        "Content".green(),
        view.body.as_deref().unwrap_or("No content.")
    );

    section("Generated curl Command");
    println!("{}", view.command);
}

/// Column-aligned listing of the active record set.
pub fn print_records_table(records: &[RecordSummary]) {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.token.clone(),
                r.ip.clone(),
                r.method.clone(),
                r.url.clone(),
                r.captured_at.format(DATE_TIME_FORMAT).to_string(),
            ]
        })
        .collect();

    let header = ["Token", "IP", "Method", "URL", "Time"];
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", format_row(&header.map(String::from), &widths).bold());
    println!("{}", format_row(&separator, &widths));
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
    println!();
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Interactive menu; the export line only appears once a token is selected.
pub fn print_menu(current_token: Option<&str>) {
    println!(
        "{} Press \"m\" to redisplay the token list.",
        "M (Menu):".cyan()
    );
    println!(
        "{} Press \"d\" to display details of a token.",
        "D (Detail):".cyan()
    );
    if let Some(token) = current_token {
        println!(
            "{} Press \"e\" to export {} as a curl command.",
            "E (Export):".cyan(),
            token.yellow()
        );
    }
    println!("{} Press \"q\" to exit.", "Q (Quit):".cyan());
}

pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "-".repeat(title.len()));
}

pub fn success(message: &str) {
    println!("{} {}", "[OK]".green().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

pub fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
    let _ = io::stdout().flush();
}
