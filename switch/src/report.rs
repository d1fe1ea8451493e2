//! Issue reporting sinks and console helpers

use std::io::{self, Write};

use colored::Colorize;

use crate::diag::issue::Issue;
use crate::errors::SwitchError;

/// Destination for findings produced by a diagnostic run
pub trait IssueSink {
    fn emit(&mut self, issue: &Issue);
}

impl IssueSink for Vec<Issue> {
    fn emit(&mut self, issue: &Issue) {
        self.push(issue.clone());
    }
}

/// Sink that prints one line per finding, with an optional console link
pub struct ConsoleSink {
    link_template: Option<String>,
}

impl ConsoleSink {
    pub fn new(link_template: Option<String>) -> Self {
        Self { link_template }
    }

    fn render(&self, issue: &Issue) -> String {
        let mut line = format!(
            "{} {}",
            format!("{:<14}", issue.serial).bold(),
            format!("{:<26}", issue.kind).yellow()
        );
        if let Some(note) = &issue.note {
            line.push(' ');
            line.push_str(note);
        }
        if let Some(template) = &self.link_template {
            let link = template.replace("{serial}", &issue.serial);
            line.push_str(&format!("  {}", link.dimmed()));
        }
        line
    }
}

impl IssueSink for ConsoleSink {
    fn emit(&mut self, issue: &Issue) {
        println!("{}", self.render(issue));
    }
}

/// Write findings as a JSON report file
pub async fn write_json_report(path: &str, issues: &[Issue]) -> Result<(), SwitchError> {
    let body = serde_json::to_string_pretty(issues)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

/// Print a progress message without a trailing newline
pub fn status(message: &str) {
    print!("{}", message.dimmed());
    let _ = io::stdout().flush();
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn failure(message: &str) {
    eprintln!("{}", message.red());
}
