use crate::inventory::SuggestionRecord;
use crate::suggest::{Basis, Resolution};
use anyhow::Result;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::path::PathBuf;
use std::time::Duration;

const PROMPT: &str = "Enter your command query: ";
const RULE_WIDTH: usize = 40;

pub struct Terminal {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl Terminal {
    pub fn new(history_file: Option<PathBuf>) -> Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .auto_add_history(false)
            .build();

        let mut editor = DefaultEditor::with_config(config)?;
        if let Some(path) = history_file.as_ref().filter(|p| p.exists()) {
            if let Err(e) = editor.load_history(path) {
                warn!("Failed to load input history from {}: {}", path.display(), e);
            }
        }

        Ok(Terminal {
            editor,
            history_file,
        })
    }

    /// Read the next query. `None` means end of input (Ctrl+D); Ctrl+C
    /// abandons the current line and yields an empty string.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let prompt = PROMPT.cyan().to_string();
        match self.editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Error reading input: {}", err)),
        }
    }

    /// One-off prompt that is kept out of the input history.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Error reading input: {}", err)),
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(e) = self.editor.save_history(path) {
                eprintln!("Warning: Failed to save input history: {}", e);
            }
        }
    }
}

pub fn print_rule() {
    println!("{}\n", "-".repeat(RULE_WIDTH));
}

pub fn print_welcome() {
    println!(
        "{}",
        "Welcome to snapshell. Describe what you want to do, or type 'exit' to quit.".cyan()
    );
}

pub fn print_goodbye() {
    println!("{}", "Exiting snapshell. Goodbye!".cyan());
}

/// Spinner for a step of unknown length. Hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos}/{len}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(message.to_string());
    bar
}

pub fn print_help() {
    println!("\n{}", "snapshell help".bright_green());
    println!("  <any text>   - Describe a task and get a suggested command");
    println!("  history      - Show previously suggested commands");
    println!("  reset        - Forget the conversation so far");
    println!("  help         - Show this help");
    println!("  exit         - Quit");
}

pub fn print_resolution(resolution: &Resolution) {
    println!("{}", "Suggested Command:".green());
    println!("\n {}\n", resolution.suggestion.command.white().bold());
    println!(
        "{} {}\n",
        "Explanation:".blue(),
        resolution.suggestion.explanation.blue()
    );
    match &resolution.basis {
        Basis::Packages(packages) => println!(
            "{}",
            format!("(based on {} installed packages)", packages.len()).dimmed()
        ),
        Basis::Fallback(reason) => println!("{}", format!("({})", reason).dimmed()),
    }
    println!(
        "{}",
        "Warning: This is a suggestion. Review and execute at your own risk.".yellow()
    );
}

pub fn print_history(records: &[SuggestionRecord]) {
    if records.is_empty() {
        println!("{}", "No history found.".yellow());
        return;
    }

    println!("{}", "Command History:".cyan());
    for record in records {
        println!("{}", format!("User Input: {}", record.user_input).green());
        println!("{}", format!("Command: {}", record.command).white());
        println!("{}", format!("Explanation: {}", record.explanation).blue());
        println!(
            "{}",
            format!("Timestamp: {}", record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")).yellow()
        );
        println!("{}", "-".repeat(RULE_WIDTH));
    }
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}
