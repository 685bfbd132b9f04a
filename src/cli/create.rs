//! Interactive badge workflow
//!
//! Drives a [`Workflow`] from the terminal: search and pick up to five
//! nonprofits, generate and choose a title, generate the badge, then write
//! the finished page to disk.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::{DirectoryApi, GenerativeApi};
use crate::error::Result;
use crate::presenter::{self, Theme};
use crate::storage::ImageStore;
use crate::workflow::{MAX_SELECTED, SearchDebouncer, Workflow};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Run the create command
pub async fn run(opts: &GlobalOptions, out: &Path) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let registry = ctx.registry()?;
    let generator = ctx.generator()?;
    let store = ctx.image_store().await?;
    let debouncer = ctx.debouncer();
    let theme = ColorfulTheme::default();

    println!("{}", "Let's make you a badge!".bold().green());
    println!("Pick up to {} nonprofits that you support.\n", MAX_SELECTED);

    let mut workflow = Workflow::new();

    select_nonprofits(&mut workflow, &registry, &debouncer, &theme).await?;
    if workflow.selection().is_empty() {
        println!("No nonprofits selected, nothing to do.");
        return Ok(());
    }

    loop {
        if !choose_title(&mut workflow, &generator, &theme).await? {
            return Ok(());
        }

        if generate(&mut workflow, &generator, store.as_ref(), &theme).await? {
            break;
        }
    }

    let html = presenter::present(workflow.session(), &Theme::default());
    std::fs::write(out, html)?;

    println!("\n{} Badge page saved to: {}", "✓".green(), out.display().to_string().bold());
    Ok(())
}

async fn select_nonprofits(
    workflow: &mut Workflow,
    registry: &dyn DirectoryApi,
    debouncer: &SearchDebouncer,
    theme: &ColorfulTheme,
) -> Result<()> {
    while !workflow.selection().is_full() {
        let query: String = Input::with_theme(theme)
            .with_prompt("Search nonprofits (blank when done)")
            .allow_empty(true)
            .interact_text()?;

        if query.trim().is_empty() {
            break;
        }

        // Only one query is ever in flight here, so it always survives
        let Some(outcome) = debouncer.search(registry, &query).await else {
            continue;
        };

        if let Some(error) = outcome.error {
            println!("{} {}", "✗".red(), error);
            continue;
        }
        if outcome.organizations.is_empty() {
            println!("{}", "No matches.".dimmed());
            continue;
        }

        let labels: Vec<String> = outcome
            .organizations
            .iter()
            .map(|o| {
                let marker = if workflow.selection().contains(&o.ein) { "✓ " } else { "" };
                format!("{}{} ({})", marker, o.name, o.ein)
            })
            .collect();

        let picked = Select::with_theme(theme)
            .with_prompt("Add which one? (Esc to search again)")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        if let Some(index) = picked {
            let org = outcome.organizations[index].clone();
            let name = org.name.clone();
            match workflow.add(org) {
                Ok(()) => println!("{} Added {}", "✓".green(), name.bold()),
                Err(e) => println!("{} {}", "⚠".yellow(), e),
            }
        }

        println!("Selected: {}\n", workflow.selection().names().join(", ").cyan());
    }

    Ok(())
}

/// Returns false when the user gives up
async fn choose_title(
    workflow: &mut Workflow,
    generator: &dyn GenerativeApi,
    theme: &ColorfulTheme,
) -> Result<bool> {
    if workflow.titles().is_empty() {
        loop {
            let pb = spinner("Thinking up titles...");
            let result = workflow.request_titles(generator).await.map(|_| ());
            pb.finish_and_clear();

            match result {
                Ok(()) => break,
                Err(e) => {
                    println!("{} {}", "✗".red(), e);
                    workflow.dismiss_error();
                    if !Confirm::with_theme(theme)
                        .with_prompt("Try again?")
                        .default(true)
                        .interact()?
                    {
                        return Ok(false);
                    }
                }
            }
        }
    }

    let titles = workflow.titles().titles().to_vec();
    let default = workflow.titles().chosen_index().unwrap_or(0);
    let index = Select::with_theme(theme)
        .with_prompt("Choose your title")
        .items(&titles)
        .default(default)
        .interact()?;
    workflow.choose_title(index);

    Ok(true)
}

/// Returns true once an artifact is stored
async fn generate(
    workflow: &mut Workflow,
    generator: &dyn GenerativeApi,
    store: &dyn ImageStore,
    theme: &ColorfulTheme,
) -> Result<bool> {
    let title = workflow.titles().chosen().unwrap_or_default().to_string();
    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("Generate a badge for \"{}\"?", title))
        .default(true)
        .interact()?;
    if !confirmed {
        return Ok(false);
    }

    let pb = spinner("Generating badge, this will take a minute...");
    let result = workflow.generate_badge(generator, store).await;
    pb.finish_and_clear();

    match result {
        Ok(artifact) => {
            println!("{} {}", "✓".green(), artifact.title.bold());
            Ok(true)
        }
        Err(e) => {
            println!("{} Badge generation failed: {}", "✗".red(), e);
            workflow.dismiss_error();
            Ok(false)
        }
    }
}
