//! Terminal rendering and the interactive browse loop

use anyhow::Result;
use catalog_client::{ItemsBrowser, ItemsSource, ListState};
use catalog_core::Item;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Render items as a table
pub fn format_item_table(items: &[Item], no_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(vec!["ID", "Name", "Category", "Price"]);
    } else {
        table.set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Category").fg(Color::Cyan),
            Cell::new("Price").fg(Color::Cyan),
        ]);
    }

    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.name),
            Cell::new(&item.category),
            Cell::new(format!("{:.2}", item.price)),
        ]);
    }

    table.to_string()
}

/// Plain-text view of the list state
pub fn render_state(state: &ListState) -> String {
    let mut out = String::new();

    if !state.query.is_empty() {
        out.push_str(&format!("Search: {}\n", state.query));
    }

    match state.status_line() {
        Some(status) => {
            out.push_str(status);
            out.push('\n');
        }
        None => {
            for item in &state.items {
                out.push_str(&format!("  #{:<15} {}\n", item.id, item.name));
            }
        }
    }

    out.push_str(&state.page_label());
    out
}

enum Command {
    Next,
    Prev,
    Quit,
    Search(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim_end_matches(['\r', '\n']) {
        ":n" | ":next" => Command::Next,
        ":p" | ":prev" => Command::Prev,
        ":q" | ":quit" => Command::Quit,
        text => Command::Search(text.to_string()),
    }
}

/// Line-based browse loop: plain lines search, `:n`/`:p` page, `:q` quits
pub async fn browse<S: ItemsSource>(browser: &ItemsBrowser<S>) -> Result<()> {
    println!("Type to search, :n next page, :p previous page, :q quit");

    let mut updates = browser.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            // Intermediate loading frames only add noise
            if !state.loading {
                println!("\n{}", render_state(&state));
            }
        }
    });

    browser.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Next => {
                if !browser.next_page() {
                    println!("(no next page)");
                }
            }
            Command::Prev => {
                if !browser.prev_page() {
                    println!("(no previous page)");
                }
            }
            Command::Quit => break,
            Command::Search(text) => browser.set_query(text),
        }
    }

    browser.shutdown();
    printer.abort();
    Ok(())
}
