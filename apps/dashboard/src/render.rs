use std::fmt::Write as _;

use client_core::{
    pagination::PaginationControls,
    view::{DisplayRow, TableBody},
    PageSnapshot,
};
use shared::{domain::Relationship, news::NewsResponse};

const IMAGE_MARKER: &str = "[image]";
const PREVIEW_CHARS: usize = 24;

pub fn render_grid(snapshot: &PageSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "relationship {} | page {} of {} | {} records",
        snapshot.relationship_id,
        snapshot.current_page,
        snapshot.total_pages,
        snapshot.total_records
    );

    match &snapshot.view.body {
        TableBody::Rows(rows) => {
            for row in rows {
                out.push_str(&render_row(row));
                out.push('\n');
            }
        }
        body => {
            if let Some(text) = body.placeholder() {
                let _ = writeln!(out, "{text}");
            }
        }
    }

    if let Some(controls) = &snapshot.view.pagination {
        let _ = writeln!(out, "{}", render_pagination(controls));
    }
    out
}

fn render_row(row: &DisplayRow) -> String {
    let columns = row
        .columns
        .iter()
        .map(|value| preview(value))
        .collect::<Vec<_>>()
        .join(" | ");
    let image = row.image.as_ref().map_or("", |_| IMAGE_MARKER);
    let document = row.document.as_ref().map_or("", |link| link.label);
    format!(
        "{:>4}. #{} {} | {} | {} | {} | {}",
        row.serial_number, row.id, row.relationship_name, columns, image, document, row.created_at
    )
}

/// `« 1 [2] 3 »`, with disabled step links shown as `-`.
pub fn render_pagination(controls: &PaginationControls) -> String {
    let mut parts = Vec::with_capacity(controls.pages.len() + 2);
    parts.push(if controls.previous.is_disabled() { "-" } else { "«" }.to_string());
    for link in &controls.pages {
        parts.push(if link.active {
            format!("[{}]", link.number)
        } else {
            link.number.to_string()
        });
    }
    parts.push(if controls.next.is_disabled() { "-" } else { "»" }.to_string());
    parts.join(" ")
}

pub fn render_relationships(relationships: &[Relationship]) -> String {
    let mut out = String::new();
    for relationship in relationships {
        let _ = writeln!(out, "{:>4}  {}", relationship.id, relationship.name);
    }
    out
}

pub fn render_news(response: &NewsResponse) -> String {
    if response.is_empty() {
        return "No news found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} results ({} shown)",
        response.total_results,
        response.articles.len()
    );
    for article in &response.articles {
        let title = article.title.as_deref().unwrap_or("(untitled)");
        let source = article
            .source
            .as_ref()
            .and_then(|source| source.name.as_deref())
            .unwrap_or("unknown source");
        let _ = writeln!(out, "- {title} ({source})");
        if let Some(published_at) = &article.published_at {
            let _ = writeln!(out, "  {published_at}");
        }
        if let Some(url) = &article.url {
            let _ = writeln!(out, "  {url}");
        }
    }
    out
}

fn preview(value: &str) -> String {
    if value.chars().count() <= PREVIEW_CHARS {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(PREVIEW_CHARS - 1).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
