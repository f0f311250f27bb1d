use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    DataPage, DataPageDeps, DeleteOutcome, EditForm, NewsService, XlsxExportSink,
};
use shared::domain::{RelationshipId, RowId};
use storage::{open_store, parse_store_location, RelationalStore, SqliteStore, StoreLocation};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod terminal;

use render::{render_grid, render_news, render_relationships};
use terminal::TerminalDialogs;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Relationship monitoring dashboard")]
struct Cli {
    /// SQLite URL or path, or the base URL of a hosted store.
    #[arg(long, env = "STORE_URL", default_value = "sqlite://./data/dashboard.db")]
    store_url: String,
    #[arg(long, env = "STORE_API_KEY", hide_env_values = true)]
    store_api_key: Option<String>,
    #[arg(long, env = "NEWS_PROXY_URL", default_value = "http://127.0.0.1:3000")]
    news_proxy_url: String,
    #[arg(long, env = "EXPORT_DIR", default_value = ".")]
    export_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of a relationship's rows.
    List {
        #[arg(long)]
        relationship: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Create a row in a relationship.
    Add {
        #[arg(long)]
        relationship: i64,
        #[command(flatten)]
        fields: RowFields,
    },
    /// Edit a row shown on the given page.
    Edit {
        #[arg(long)]
        relationship: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        row: i64,
        #[command(flatten)]
        fields: RowFields,
    },
    /// Delete a row after confirmation.
    Delete {
        #[arg(long)]
        relationship: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        row: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Export the rows of one page to an .xlsx workbook.
    Export {
        #[arg(long)]
        relationship: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List the known relationships.
    Relationships,
    /// Create a relationship in a local SQLite store.
    SeedRelationship { name: String },
    /// Search news through the proxy.
    News {
        #[arg(long, conflicts_with = "query")]
        relationship_name: Option<String>,
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Args, Debug, Default)]
struct RowFields {
    #[arg(long)]
    col1: Option<String>,
    #[arg(long)]
    col2: Option<String>,
    #[arg(long)]
    col3: Option<String>,
    #[arg(long)]
    col4: Option<String>,
    #[arg(long)]
    col5: Option<String>,
    #[arg(long)]
    col6: Option<String>,
    /// Image file to embed as Column 7.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Document file to embed as Column 8.
    #[arg(long)]
    document: Option<PathBuf>,
    /// Move the row to another relationship.
    #[arg(long)]
    target_relationship: Option<i64>,
}

impl RowFields {
    /// Fields that were not given keep the form's current values.
    fn apply(self, form: &mut EditForm) {
        let columns = [
            self.col1, self.col2, self.col3, self.col4, self.col5, self.col6,
        ];
        for (index, value) in columns.into_iter().enumerate() {
            if let Some(value) = value {
                form.set_column(index + 1, value);
            }
        }
        if let Some(id) = self.target_relationship {
            form.relationship_id = Some(RelationshipId(id));
        }
        form.image_file = self.image;
        form.document_file = self.document;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let location = parse_store_location(&cli.store_url);

    match cli.command {
        Command::News {
            relationship_name,
            query,
            page,
        } => {
            let news = NewsService::new(cli.news_proxy_url);
            let response = match (relationship_name, query) {
                (Some(name), _) => news.fetch_news_for_relationship(&name, page).await,
                (None, Some(query)) => news.search_news(&query, page).await,
                (None, None) => news.fetch_default_news(page).await,
            };
            print!("{}", render_news(&response));
        }
        Command::SeedRelationship { name } => {
            let StoreLocation::Sqlite(database_url) = &location else {
                bail!("seed-relationship only works with a SQLite store");
            };
            let store = SqliteStore::new(database_url)
                .await
                .with_context(|| format!("failed to open {database_url}"))?;
            let id = store.create_relationship(&name).await?;
            println!("created relationship_id={id}");
        }
        command => {
            let store = open_store(&location, cli.store_api_key.as_deref())
                .await
                .context("failed to open store")?;
            run_grid_command(command, store, cli.export_dir).await?;
        }
    }

    Ok(())
}

async fn run_grid_command(
    command: Command,
    store: Arc<dyn RelationalStore>,
    export_dir: PathBuf,
) -> Result<()> {
    let assume_yes = matches!(command, Command::Delete { yes: true, .. });
    let page_for = |relationship: i64| {
        DataPage::new(
            RelationshipId(relationship),
            DataPageDeps {
                store: store.clone(),
                export: Arc::new(XlsxExportSink::new(export_dir.clone())),
                dialogs: Arc::new(TerminalDialogs::new(assume_yes)),
            },
        )
    };

    match command {
        Command::List { relationship, page } => {
            let grid = page_for(relationship);
            let _ = grid.load_table_data(page).await;
            print!("{}", render_grid(&grid.snapshot().await));
        }
        Command::Add {
            relationship,
            fields,
        } => {
            let grid = page_for(relationship);
            grid.init().await;
            let mut form = grid.open_edit_modal(None).await;
            fields.apply(&mut form);
            grid.save_edit(form).await?;
            print!("{}", render_grid(&grid.snapshot().await));
        }
        Command::Edit {
            relationship,
            page,
            row,
            fields,
        } => {
            let grid = page_for(relationship);
            grid.load_relationships().await;
            grid.load_table_data(page).await?;
            let mut form = grid.edit_row(RowId(row)).await;
            fields.apply(&mut form);
            grid.save_edit(form).await?;
            print!("{}", render_grid(&grid.snapshot().await));
        }
        Command::Delete {
            relationship,
            page,
            row,
            ..
        } => {
            let grid = page_for(relationship);
            grid.load_table_data(page).await?;
            if grid.delete_row(RowId(row)).await? == DeleteOutcome::Deleted {
                print!("{}", render_grid(&grid.snapshot().await));
            }
        }
        Command::Export { relationship, page } => {
            let grid = page_for(relationship);
            grid.load_table_data(page).await?;
            if let Some(path) = grid.export_to_excel().await? {
                info!(path = %path.display(), "exported page");
                println!("{}", path.display());
            }
        }
        Command::Relationships => {
            let relationships = store.list_relationships().await?;
            print!("{}", render_relationships(&relationships));
        }
        Command::News { .. } | Command::SeedRelationship { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
