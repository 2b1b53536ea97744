//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::clipboard::CopyFeedback;
use crate::commands::{self, ListAction, ListKind};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pfegen_domain::ProjectMetadata;
use pfegen_drafter::{DraftStudio, EditOutcome};
use pfegen_llm::ChatProvider;
use rustyline::config::Config as EditorConfig;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// REPL command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Help,
    Show,
    Set { field: String, value: String },
    List { kind: ListKind, action: ListAction },
    Load(PathBuf),
    Generate,
    Edit(String),
    Doc,
    Chat,
    Status,
    Copy,
    Save(PathBuf),
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// State of one interactive session: the form being filled in and the
/// drafting studio behind it.
pub struct ReplSession<P: ChatProvider> {
    studio: DraftStudio<P>,
    metadata: ProjectMetadata,
    defaults: ProjectMetadata,
    formatter: Formatter,
    feedback: CopyFeedback,
}

impl<P: ChatProvider> ReplSession<P> {
    /// Create a session whose form starts from `defaults`.
    pub fn new(studio: DraftStudio<P>, defaults: ProjectMetadata, formatter: Formatter) -> Self {
        Self {
            studio,
            metadata: defaults.clone(),
            defaults,
            formatter,
            feedback: CopyFeedback::new(),
        }
    }

    /// Current project form.
    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    /// Drafting studio.
    pub fn studio(&self) -> &DraftStudio<P> {
        &self.studio
    }

    /// Prompt text, showing the copy indicator while it is active.
    pub fn prompt(&self) -> &'static str {
        if self.feedback.is_active() {
            "pfegen (copied)> "
        } else {
            "pfegen> "
        }
    }

    /// Run one parsed command.
    pub async fn execute(&mut self, cmd: ReplCommand) -> Result<Flow> {
        let formatter = &self.formatter;
        match cmd {
            ReplCommand::Exit => {
                println!("{}", formatter.info("Goodbye!"));
                return Ok(Flow::Exit);
            }
            ReplCommand::Help => print_help(formatter),
            ReplCommand::Show => println!("{}", formatter.format_metadata(&self.metadata)),
            ReplCommand::Set { field, value } => {
                let message = commands::execute_set(&mut self.metadata, &field, &value)?;
                println!("{}", formatter.success(&message));
            }
            ReplCommand::List { kind, action } => {
                let message = commands::execute_list(&mut self.metadata, kind, action)?;
                println!("{}", formatter.success(&message));
            }
            ReplCommand::Load(path) => {
                let message = commands::execute_load(&mut self.metadata, &self.defaults, &path)?;
                println!("{}", formatter.success(&message));
            }
            ReplCommand::Generate => {
                commands::run_generation(&self.studio, &self.metadata, formatter).await?;
                println!("{}", formatter.format_document(&self.studio.document()));
                if let Some(entry) = self.studio.transcript().last() {
                    println!("{}", formatter.assistant(&entry.text));
                }
            }
            ReplCommand::Edit(instruction) => {
                match commands::run_edit(&self.studio, &instruction, formatter).await? {
                    EditOutcome::Applied { summary } => {
                        println!("{}", formatter.assistant(&summary));
                        println!("{}", formatter.info("Use 'doc' to view the updated document"));
                    }
                    EditOutcome::Failed { .. } => {
                        if let Some(entry) = self.studio.transcript().last() {
                            println!("{}", formatter.error(&entry.text));
                        }
                    }
                }
            }
            ReplCommand::Doc => println!("{}", formatter.format_document(&self.studio.document())),
            ReplCommand::Chat => {
                println!("{}", formatter.format_transcript(&self.studio.transcript()))
            }
            ReplCommand::Status => println!("{}", formatter.format_status(&self.studio.snapshot())),
            ReplCommand::Copy => {
                commands::copy_document(&self.studio.document(), &mut std::io::stdout())?;
                self.feedback.mark();
                println!("{}", formatter.success("Copied to clipboard"));
            }
            ReplCommand::Save(path) => {
                commands::save_document(&self.studio.document(), &path)?;
                println!("{}", formatter.success(&format!("Saved to {}", path.display())));
            }
        }
        Ok(Flow::Continue)
    }
}

/// Run the interactive REPL.
pub async fn run_repl<P: ChatProvider>(
    session: &mut ReplSession<P>,
    history_size: usize,
) -> Result<()> {
    println!(
        "{}",
        session
            .formatter
            .info("pfegen REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline(session.prompt()) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(cmd) => match session.execute(cmd).await {
                        Ok(Flow::Exit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{}", session.formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", session.formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", session.formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", session.formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_lowercase().as_str() {
        "" => Err(CliError::InvalidInput("Empty command".to_string())),
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "show" | "form" => Ok(ReplCommand::Show),
        "set" => parse_set_command(rest),
        "supervisor" | "supervisors" => parse_list_command(ListKind::Supervisor, rest),
        "jury" => parse_list_command(ListKind::Jury, rest),
        "load" => Ok(ReplCommand::Load(required_path("load", rest)?)),
        "generate" | "gen" => Ok(ReplCommand::Generate),
        "edit" | "ask" => {
            if rest.is_empty() {
                Err(CliError::InvalidInput("Usage: edit <instruction>".to_string()))
            } else {
                Ok(ReplCommand::Edit(rest.to_string()))
            }
        }
        "doc" | "document" => Ok(ReplCommand::Doc),
        "chat" | "history" => Ok(ReplCommand::Chat),
        "status" => Ok(ReplCommand::Status),
        "copy" => Ok(ReplCommand::Copy),
        "save" => Ok(ReplCommand::Save(required_path("save", rest)?)),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

fn parse_set_command(rest: &str) -> Result<ReplCommand> {
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .map(|(field, value)| (field, value.trim()))
        .unwrap_or((rest, ""));

    if field.is_empty() {
        return Err(CliError::InvalidInput(
            "Usage: set <field> <value>".to_string(),
        ));
    }

    Ok(ReplCommand::Set {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_list_command(kind: ListKind, rest: &str) -> Result<ReplCommand> {
    let usage = || {
        CliError::InvalidInput(
            "Usage: supervisor|jury add [name] | remove <n> | set <n> <name>".to_string(),
        )
    };

    let (action, args) = rest
        .split_once(char::is_whitespace)
        .map(|(action, args)| (action, args.trim()))
        .unwrap_or((rest, ""));

    let action = match action {
        "add" => ListAction::Add(Some(args.to_string()).filter(|name| !name.is_empty())),
        "remove" | "rm" => ListAction::Remove(parse_position(args).ok_or_else(usage)?),
        "set" => {
            let (position, name) = args.split_once(char::is_whitespace).ok_or_else(usage)?;
            ListAction::Set(parse_position(position).ok_or_else(usage)?, name.trim().to_string())
        }
        _ => return Err(usage()),
    };

    Ok(ReplCommand::List { kind, action })
}

fn parse_position(s: &str) -> Option<usize> {
    s.trim().parse().ok()
}

fn required_path(command: &str, rest: &str) -> Result<PathBuf> {
    if rest.is_empty() {
        return Err(CliError::InvalidInput(format!("Usage: {} <file>", command)));
    }
    Ok(PathBuf::from(rest))
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let pfegen_dir = home.join(".pfegen");
    std::fs::create_dir_all(&pfegen_dir)?;
    Ok(pfegen_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  show                          - Show the project form");
    println!("  set <field> <value>           - Set a field");
    println!("    fields: institution, department, year, title, student,");
    println!("            program, description, keywords, instructions");
    println!("  supervisor add [name]         - Add a supervisor (2 max)");
    println!("  supervisor remove <n>         - Remove supervisor n");
    println!("  supervisor set <n> <name>     - Rename supervisor n");
    println!("  jury add|remove|set ...       - Same for jury members (5 max)");
    println!("  load <file.toml>              - Load the form from a file");
    println!("  generate                      - Generate the report structure");
    println!("  edit <instruction>            - Ask the assistant to change the document");
    println!("  ask <instruction>             - Same as edit");
    println!("  doc                           - Show the current document");
    println!("  chat                          - Show the assistant conversation");
    println!("  status                        - Show generation status");
    println!("  copy                          - Copy the document to the clipboard");
    println!("  save <file>                   - Write the document to a file");
    println!("  help, ?                       - Show this help");
    println!("  exit, quit, q                 - Exit REPL");
    println!();
}
