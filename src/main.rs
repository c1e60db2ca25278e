use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use snapshell::cli::Cli;
use snapshell::config::Config;
use snapshell::inventory::InventoryStore;
use snapshell::llm::APIClient;
use snapshell::package_manager::PackageManager;
use snapshell::shell::Shell;
use snapshell::suggest::SuggestionEngine;
use snapshell::terminal::{self, Terminal};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(model) = cli.model.clone() {
        config.llm_model = model;
    }

    if let Some(api_key) = cli.set_api_key.as_deref() {
        config.save_api_key(api_key)?;
        println!(
            "{}",
            format!("API key saved to {}", config.config_path().display()).green()
        );
        return Ok(());
    }

    let store = InventoryStore::open(config.db_path()).context("Failed to open the inventory database")?;

    if cli.update_db {
        update_inventory(&store, PackageManager::detect()?)?;
    }

    if cli.view_history {
        terminal::print_history(&store.history()?);
        return Ok(());
    }

    if cli.clear_history {
        let removed = store.clear_history()?;
        println!(
            "{}",
            format!("Command history cleared successfully ({} entries).", removed).green()
        );
        return Ok(());
    }

    let package_manager = PackageManager::detect()?;
    let mut terminal = Terminal::new(Some(config.input_history_path()))?;

    if !config.has_api_key() {
        prompt_for_api_key(&mut terminal, &mut config)?;
    }

    if store.package_count().unwrap_or(0) == 0 {
        println!(
            "{}",
            "The package inventory is empty. Run `snapshell --update-db` for better suggestions."
                .yellow()
        );
    }

    let client = APIClient::new(&config)?;
    let max_context_turns = config.max_context_turns;
    let engine = SuggestionEngine::new(&config, client, store, package_manager.to_string());

    let mut shell = Shell::new(terminal, engine, max_context_turns);
    shell.run().await?;

    Ok(())
}

fn update_inventory(store: &InventoryStore, package_manager: PackageManager) -> Result<()> {
    let spinner = terminal::spinner(&format!("Reading installed packages from {}...", package_manager));
    let listed = package_manager.list_installed();
    spinner.finish_and_clear();
    let packages =
        listed.with_context(|| format!("Failed to list packages with {}", package_manager))?;

    let bar = terminal::progress_bar(packages.len() as u64, "Updating database");
    let written = store.upsert_packages_with_progress(&packages, |_| bar.inc(1));
    bar.finish_and_clear();
    let written = written?;

    println!(
        "{}",
        format!("Database updated successfully ({} packages).", written).green()
    );
    Ok(())
}

fn prompt_for_api_key(terminal: &mut Terminal, config: &mut Config) -> Result<()> {
    println!(
        "{}",
        "No API key configured. Get one at https://console.groq.com/keys".yellow()
    );

    match terminal.ask("Enter your Groq API key (leave empty to skip): ")? {
        Some(key) if !key.is_empty() => {
            config.save_api_key(&key)?;
            println!(
                "{}",
                format!("API key saved to {}", config.config_path().display()).green()
            );
        }
        _ => println!(
            "{}",
            "Continuing without an API key; suggestions will fail until one is set.".yellow()
        ),
    }

    Ok(())
}
