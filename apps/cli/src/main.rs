use anyhow::Result;
use clap::{Parser, Subcommand};
use client_store::{FetchMode, FormStore, TemplateStore};
use shared::protocol::{FormRecord, TemplateRecord};
use tracing::info;

mod config;

#[derive(Parser, Debug)]
struct Cli {
    /// Backend base URL; overrides client.toml and the environment.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the signed-in profile.
    Profile,
    /// Fetch the form list, optionally walking extra pages.
    Forms {
        #[arg(long, default_value_t = 0)]
        more_pages: u32,
    },
    /// Fetch templates.
    Templates {
        /// Show only templates with status "active".
        #[arg(long)]
        active_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    let base_url = config::validate_base_url(&settings.base_url)?;
    info!(base_url = %base_url, "acc: using backend");

    match cli.command {
        Command::Profile => run_profile(&base_url).await,
        Command::Forms { more_pages } => run_forms(&base_url, settings.page_limit, more_pages).await,
        Command::Templates { active_only } => run_templates(&base_url, active_only).await,
    }
}

async fn run_profile(base_url: &str) -> Result<()> {
    let store = FormStore::new(base_url);
    store.fetch_profile().await;
    let snapshot = store.snapshot().await;
    if let Some(err) = snapshot.last_error {
        anyhow::bail!("profile fetch failed: {err}");
    }
    match snapshot.profile {
        Some(profile) => {
            println!("user_id={} username={}", profile.id.0, profile.username);
            if let Some(email) = profile.email {
                println!("email={email}");
            }
        }
        None => println!("no profile returned"),
    }
    Ok(())
}

async fn run_forms(base_url: &str, page_limit: u32, more_pages: u32) -> Result<()> {
    let store = FormStore::with_page_limit(base_url, page_limit);
    store.fetch_forms(FetchMode::Replace).await;
    for _ in 0..more_pages {
        store.advance_page().await;
        store.fetch_forms(FetchMode::Append).await;
    }
    let snapshot = store.snapshot().await;
    if let Some(err) = snapshot.last_error {
        anyhow::bail!("form fetch failed: {err}");
    }
    for item in snapshot.menu_items() {
        print_form(&item.label, &item.form);
    }
    println!(
        "{} of {} forms loaded",
        snapshot.forms.len(),
        snapshot.page.total_results
    );
    Ok(())
}

async fn run_templates(base_url: &str, active_only: bool) -> Result<()> {
    let store = TemplateStore::new(base_url);
    store.fetch_templates().await;
    let snapshot = store.snapshot().await;
    if let Some(err) = snapshot.last_error {
        anyhow::bail!("template fetch failed: {err}");
    }
    if active_only {
        for template in snapshot.active_templates() {
            print_template(template);
        }
    } else {
        for template in &snapshot.templates {
            print_template(template);
        }
    }
    Ok(())
}

fn print_form(label: &str, form: &FormRecord) {
    match &form.description {
        Some(description) => println!("form_id={} {label}: {description}", form.id.0),
        None => println!("form_id={} {label}", form.id.0),
    }
}

fn print_template(template: &TemplateRecord) {
    println!(
        "template_id={} {} [{}]",
        template.id.0, template.name, template.status
    );
}
