//! Project form commands: field edits and name lists.

use crate::error::{CliError, Result};
use crate::metadata_file::load_metadata;
use pfegen_domain::{MetadataField, NameList, ProjectMetadata};
use std::path::Path;

/// Which name list a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Supervisor,
    Jury,
}

impl ListKind {
    fn name(&self) -> &'static str {
        match self {
            ListKind::Supervisor => "supervisor",
            ListKind::Jury => "jury member",
        }
    }

    fn list<'a>(&self, metadata: &'a mut ProjectMetadata) -> &'a mut NameList {
        match self {
            ListKind::Supervisor => &mut metadata.supervisors,
            ListKind::Jury => &mut metadata.jury_members,
        }
    }
}

/// Mutation of a name list. Positions are 1-based as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Add(Option<String>),
    Remove(usize),
    Set(usize, String),
}

/// Set one text field, returning a confirmation message.
pub fn execute_set(metadata: &mut ProjectMetadata, field: &str, value: &str) -> Result<String> {
    let field = MetadataField::parse(field).ok_or_else(|| {
        let known: Vec<&str> = MetadataField::ALL.iter().map(|f| f.as_str()).collect();
        CliError::InvalidInput(format!(
            "Unknown field '{}'. Known fields: {}",
            field,
            known.join(", ")
        ))
    })?;

    metadata.set_field(field, value.trim());
    Ok(format!("{} updated", field.label()))
}

/// Apply a list mutation, returning a confirmation message.
pub fn execute_list(
    metadata: &mut ProjectMetadata,
    kind: ListKind,
    action: ListAction,
) -> Result<String> {
    let list = kind.list(metadata);
    let message = match action {
        ListAction::Add(name) => {
            let added = match name {
                Some(name) => list.push(name.trim()),
                None => list.push_empty(),
            };
            if !added {
                return Err(CliError::InvalidInput(format!(
                    "At most {} {} entries allowed",
                    list.capacity(),
                    kind.name()
                )));
            }
            format!("Added {} #{}", kind.name(), list.len())
        }
        ListAction::Remove(position) => {
            let removed = list.remove(to_index(position)?)?;
            if removed.trim().is_empty() {
                format!("Removed {} #{}", kind.name(), position)
            } else {
                format!("Removed {} {}", kind.name(), removed)
            }
        }
        ListAction::Set(position, name) => {
            list.set(to_index(position)?, name.trim())?;
            format!("Set {} #{}", kind.name(), position)
        }
    };

    Ok(format!("{} ({}/{} max)", message, list.len(), list.capacity()))
}

/// Replace the form with the contents of a metadata file.
pub fn execute_load(
    metadata: &mut ProjectMetadata,
    base: &ProjectMetadata,
    path: &Path,
) -> Result<String> {
    *metadata = load_metadata(path, base)?;
    Ok(format!("Loaded project from {}", path.display()))
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| CliError::InvalidInput("Positions start at 1".to_string()))
}
