//! Output formatting for the CLI.

use crate::highlight::highlight;
use chrono::{DateTime, Local};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use pfegen_domain::{MetadataField, NameList, ProjectMetadata, Role, Transcript};
use pfegen_drafter::StudioSnapshot;
use std::time::Duration;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format the project form as a table.
    pub fn format_metadata(&self, metadata: &ProjectMetadata) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);

        for field in [
            MetadataField::Institution,
            MetadataField::Department,
            MetadataField::AcademicYear,
            MetadataField::Title,
            MetadataField::StudentName,
        ] {
            builder.push_record([field_key(field), display_value(metadata.field(field))]);
        }
        builder.push_record([
            names_header("supervisor", &metadata.supervisors),
            numbered(&metadata.supervisors),
        ]);
        builder.push_record([
            names_header("jury", &metadata.jury_members),
            numbered(&metadata.jury_members),
        ]);
        for field in [
            MetadataField::Program,
            MetadataField::Description,
            MetadataField::Keywords,
            MetadataField::CustomInstructions,
        ] {
            builder.push_record([field_key(field), display_value(metadata.field(field))]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the chat history.
    pub fn format_transcript(&self, transcript: &Transcript) -> String {
        if transcript.is_empty() {
            return self.colorize("No messages yet.", "yellow");
        }

        let mut lines = Vec::with_capacity(transcript.len());
        for entry in transcript.entries() {
            let time: DateTime<Local> = entry.created_at.into();
            let author = match entry.role {
                Role::User => self.colorize("you", "cyan"),
                Role::Assistant => self.colorize("assistant", "magenta"),
            };
            lines.push(format!("[{}] {}: {}", time.format("%H:%M"), author, entry.text));
        }
        lines.join("\n")
    }

    /// Format the studio status line.
    pub fn format_status(&self, snapshot: &StudioSnapshot) -> String {
        let status = snapshot.status.as_str();
        let status = match status {
            "success" => self.colorize(status, "green"),
            "error" => self.colorize(status, "red"),
            "loading" => self.colorize(status, "yellow"),
            _ => status.to_string(),
        };

        let document = if snapshot.document.is_empty() {
            "none".to_string()
        } else {
            format!("{} lines", snapshot.document.lines().count())
        };

        format!(
            "Status: {} | Document: {} | Messages: {}{}",
            status,
            document,
            snapshot.transcript.len(),
            if snapshot.sending { " | edit in flight" } else { "" }
        )
    }

    /// Format a LaTeX document for display.
    pub fn format_document(&self, document: &str) -> String {
        if document.is_empty() {
            return self.colorize("No document yet. Use 'generate' first.", "yellow");
        }
        highlight(document, self.color_enabled)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an assistant reply.
    pub fn assistant(&self, message: &str) -> String {
        format!("{} {}", self.colorize("assistant:", "magenta"), message)
    }

    /// Spinner shown while a request is in flight.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn field_key(field: MetadataField) -> String {
    format!("{} ({})", field.label(), field.as_str())
}

fn display_value(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn names_header(key: &str, names: &NameList) -> String {
    let label = if key == "jury" { "Jury members" } else { "Supervisors" };
    format!("{} ({}, {}/{} max)", label, key, names.len(), names.capacity())
}

fn numbered(names: &NameList) -> String {
    names
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, display_value(name)))
        .collect::<Vec<_>>()
        .join("\n")
}
