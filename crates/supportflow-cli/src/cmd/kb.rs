//! `sf kb` — knowledge-base management. Reads are open to everyone;
//! mutations are admin-gated by the store.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::model::KbArticle;
use supportflow_view::search_articles;

use crate::output::{fail, pretty_rule, render, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct KbArgs {
    #[command(subcommand)]
    pub command: KbCommand,
}

#[derive(Subcommand, Debug)]
pub enum KbCommand {
    /// List every article.
    List,

    /// Search articles by title, body, or tag.
    Search {
        /// Case-insensitive query.
        query: String,
    },

    /// Show one article in full.
    Show {
        /// Article id.
        id: u64,
    },

    /// Add an article (admin only).
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        body: String,
        /// Repeatable: --tag billing --tag refund
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an article (admin only).
    Edit {
        /// Article id.
        id: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        body: Option<String>,
        /// Replaces the whole tag set when given.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete an article (admin only).
    Rm {
        /// Article id.
        id: u64,
    },
}

#[derive(Debug, Serialize)]
struct ArticleList {
    articles: Vec<KbArticle>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct ArticleOutput {
    ok: bool,
    article: KbArticle,
}

#[derive(Debug, Serialize)]
struct RemovedOutput {
    ok: bool,
    removed_id: u64,
}

fn render_articles(articles: Vec<KbArticle>, output: OutputMode) -> anyhow::Result<()> {
    render(
        output,
        &ArticleList {
            total: articles.len(),
            articles,
        },
        |out, w| {
            if out.articles.is_empty() {
                return writeln!(w, "No articles found.");
            }
            for article in &out.articles {
                writeln!(w, "#{:<3} {} [{}]", article.id, article.title, article.tags.join(", "))?;
            }
            Ok(())
        },
    )
}

#[allow(clippy::too_many_lines)]
pub fn run_kb(args: &KbArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;

    match &args.command {
        KbCommand::List => render_articles(workspace.store.articles().to_vec(), output),
        KbCommand::Search { query } => {
            let hits = search_articles(workspace.store.articles(), query)
                .into_iter()
                .cloned()
                .collect();
            render_articles(hits, output)
        }
        KbCommand::Show { id } => {
            let article = workspace
                .store
                .article(*id)
                .map_err(|err| fail(output, &err))?
                .clone();
            render(
                output,
                &ArticleOutput { ok: true, article },
                |out, w| {
                    writeln!(w, "#{} {}", out.article.id, out.article.title)?;
                    pretty_rule(w)?;
                    writeln!(w, "{}", out.article.body)?;
                    if !out.article.tags.is_empty() {
                        writeln!(w, "\ntags: {}", out.article.tags.join(", "))?;
                    }
                    Ok(())
                },
            )
        }
        KbCommand::Add { title, body, tags } => {
            let actor = session::current_user(&workspace, output)?;
            let article = workspace
                .store
                .add_article(title, body, tags.clone(), actor.role)
                .map_err(|err| fail(output, &err))?;
            render(
                output,
                &ArticleOutput { ok: true, article },
                |out, w| writeln!(w, "Added article #{}: {}", out.article.id, out.article.title),
            )
        }
        KbCommand::Edit {
            id,
            title,
            body,
            tags,
        } => {
            let actor = session::current_user(&workspace, output)?;
            let mut article = workspace
                .store
                .article(*id)
                .map_err(|err| fail(output, &err))?
                .clone();
            if let Some(title) = title {
                article.title.clone_from(title);
            }
            if let Some(body) = body {
                article.body.clone_from(body);
            }
            if !tags.is_empty() {
                article.tags.clone_from(tags);
            }
            workspace
                .store
                .update_article(article.clone(), actor.role)
                .map_err(|err| fail(output, &err))?;
            render(
                output,
                &ArticleOutput { ok: true, article },
                |out, w| writeln!(w, "Updated article #{}.", out.article.id),
            )
        }
        KbCommand::Rm { id } => {
            let actor = session::current_user(&workspace, output)?;
            workspace
                .store
                .delete_article(*id, actor.role)
                .map_err(|err| fail(output, &err))?;
            render(
                output,
                &RemovedOutput {
                    ok: true,
                    removed_id: *id,
                },
                |out, w| writeln!(w, "Removed article #{}.", out.removed_id),
            )
        }
    }
}
