//! Project metadata files.
//!
//! A metadata file is plain TOML:
//!
//! ```toml
//! title = "Fraud detection with graph neural networks"
//! student = "Salma El Idrissi"
//! supervisors = ["Pr. Amrani"]
//! jury = ["Pr. Berrada", "Dr. Tazi"]
//! description = "..."
//! ```
//!
//! Missing institutional fields fall back to the configured defaults.

use crate::error::{CliError, Result};
use pfegen_domain::{NameList, ProjectMetadata, JURY_CAPACITY, SUPERVISOR_CAPACITY};
use serde::Deserialize;
use std::path::Path;

/// On-disk shape of a metadata file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataDefinition {
    pub institution: Option<String>,
    pub department: Option<String>,
    #[serde(alias = "academic_year")]
    pub year: Option<String>,
    pub title: String,
    #[serde(alias = "student_name")]
    pub student: String,
    pub supervisors: Vec<String>,
    #[serde(alias = "jury_members")]
    pub jury: Vec<String>,
    pub program: String,
    pub description: String,
    pub keywords: String,
    #[serde(alias = "custom_instructions")]
    pub instructions: String,
}

impl MetadataDefinition {
    /// Parse a definition from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Build project metadata on top of `base`, which supplies the
    /// institutional defaults.
    pub fn into_metadata(self, base: &ProjectMetadata) -> Result<ProjectMetadata> {
        let supervisors = bounded_list("supervisors", self.supervisors, SUPERVISOR_CAPACITY)?;
        let jury_members = bounded_list("jury", self.jury, JURY_CAPACITY)?;

        Ok(ProjectMetadata {
            institution: self.institution.unwrap_or_else(|| base.institution.clone()),
            department: self.department.unwrap_or_else(|| base.department.clone()),
            academic_year: self.year.unwrap_or_else(|| base.academic_year.clone()),
            title: self.title,
            student_name: self.student,
            supervisors,
            jury_members,
            program: self.program,
            description: self.description,
            keywords: self.keywords,
            custom_instructions: self.instructions,
        })
    }
}

fn bounded_list(name: &str, names: Vec<String>, capacity: usize) -> Result<NameList> {
    if names.len() > capacity {
        return Err(CliError::InvalidInput(format!(
            "{} lists {} names but at most {} are allowed",
            name,
            names.len(),
            capacity
        )));
    }
    Ok(NameList::from_names(names, capacity))
}

/// Read a metadata file from disk.
pub fn load_metadata(path: &Path, base: &ProjectMetadata) -> Result<ProjectMetadata> {
    let contents = std::fs::read_to_string(path)?;
    MetadataDefinition::from_toml(&contents)?.into_metadata(base)
}
