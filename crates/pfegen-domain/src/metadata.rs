//! Project metadata - the structured form behind every generated report

use crate::names::{NameList, JURY_CAPACITY, SUPERVISOR_CAPACITY};
use std::fmt;

/// Default institution name
pub const DEFAULT_INSTITUTION: &str = "Université Mohammed Premier";

/// Default department (school) name
pub const DEFAULT_DEPARTMENT: &str = "Ecole Nationale des Sciences Appliquées Oujda";

/// Default academic year label
pub const DEFAULT_ACADEMIC_YEAR: &str = "2025-2026";

/// Editable text field of [`ProjectMetadata`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    /// University or institution name
    Institution,
    /// School or department name
    Department,
    /// Academic year label, e.g. "2025-2026"
    AcademicYear,
    /// Project title
    Title,
    /// Student full name
    StudentName,
    /// Program or track name
    Program,
    /// Free-text project description
    Description,
    /// Free-text keywords and themes
    Keywords,
    /// Extra instructions passed verbatim to the model
    CustomInstructions,
}

impl MetadataField {
    /// Every text field, in form order
    pub const ALL: [MetadataField; 9] = [
        MetadataField::Institution,
        MetadataField::Department,
        MetadataField::AcademicYear,
        MetadataField::Title,
        MetadataField::StudentName,
        MetadataField::Program,
        MetadataField::Description,
        MetadataField::Keywords,
        MetadataField::CustomInstructions,
    ];

    /// Short user-facing key
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Institution => "institution",
            MetadataField::Department => "department",
            MetadataField::AcademicYear => "year",
            MetadataField::Title => "title",
            MetadataField::StudentName => "student",
            MetadataField::Program => "program",
            MetadataField::Description => "description",
            MetadataField::Keywords => "keywords",
            MetadataField::CustomInstructions => "instructions",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::Institution => "Institution",
            MetadataField::Department => "Department",
            MetadataField::AcademicYear => "Academic year",
            MetadataField::Title => "Project title",
            MetadataField::StudentName => "Student",
            MetadataField::Program => "Program",
            MetadataField::Description => "Description",
            MetadataField::Keywords => "Keywords",
            MetadataField::CustomInstructions => "Custom instructions",
        }
    }

    /// Parse a field key, accepting a few aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "institution" | "university" => Some(MetadataField::Institution),
            "department" | "school" => Some(MetadataField::Department),
            "year" | "academic-year" | "academic_year" => Some(MetadataField::AcademicYear),
            "title" => Some(MetadataField::Title),
            "student" | "student-name" | "student_name" => Some(MetadataField::StudentName),
            "program" | "track" => Some(MetadataField::Program),
            "description" => Some(MetadataField::Description),
            "keywords" => Some(MetadataField::Keywords),
            "instructions" | "custom-instructions" | "custom_instructions" => {
                Some(MetadataField::CustomInstructions)
            }
            _ => None,
        }
    }
}

impl std::str::FromStr for MetadataField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown field: {}", s))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata is not complete enough to request a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataError {
    /// Required fields that are blank
    pub missing: Vec<MetadataField>,
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.missing.iter().map(|field| field.label()).collect();
        write!(f, "please fill in at least: {}", labels.join(", "))
    }
}

impl std::error::Error for MetadataError {}

/// Everything the user tells us about their project.
///
/// Lives only for the running session; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// University or institution name
    pub institution: String,
    /// School or department name
    pub department: String,
    /// Academic year label
    pub academic_year: String,
    /// Project title
    pub title: String,
    /// Student full name
    pub student_name: String,
    /// Supervisors, at most two
    pub supervisors: NameList,
    /// Jury members, at most five
    pub jury_members: NameList,
    /// Program or track name
    pub program: String,
    /// Free-text description of the project
    pub description: String,
    /// Free-text keywords
    pub keywords: String,
    /// Free-text custom instructions
    pub custom_instructions: String,
}

impl ProjectMetadata {
    /// Metadata with explicit institutional values and everything else blank
    pub fn with_institution(
        institution: impl Into<String>,
        department: impl Into<String>,
        academic_year: impl Into<String>,
    ) -> Self {
        Self {
            institution: institution.into(),
            department: department.into(),
            academic_year: academic_year.into(),
            title: String::new(),
            student_name: String::new(),
            supervisors: NameList::new(SUPERVISOR_CAPACITY),
            jury_members: NameList::new(JURY_CAPACITY),
            program: String::new(),
            description: String::new(),
            keywords: String::new(),
            custom_instructions: String::new(),
        }
    }

    /// Read one text field
    pub fn field(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Institution => &self.institution,
            MetadataField::Department => &self.department,
            MetadataField::AcademicYear => &self.academic_year,
            MetadataField::Title => &self.title,
            MetadataField::StudentName => &self.student_name,
            MetadataField::Program => &self.program,
            MetadataField::Description => &self.description,
            MetadataField::Keywords => &self.keywords,
            MetadataField::CustomInstructions => &self.custom_instructions,
        }
    }

    /// Overwrite one text field
    pub fn set_field(&mut self, field: MetadataField, value: impl Into<String>) {
        let slot = match field {
            MetadataField::Institution => &mut self.institution,
            MetadataField::Department => &mut self.department,
            MetadataField::AcademicYear => &mut self.academic_year,
            MetadataField::Title => &mut self.title,
            MetadataField::StudentName => &mut self.student_name,
            MetadataField::Program => &mut self.program,
            MetadataField::Description => &mut self.description,
            MetadataField::Keywords => &mut self.keywords,
            MetadataField::CustomInstructions => &mut self.custom_instructions,
        };
        *slot = value.into();
    }

    /// Check the minimum needed before asking for a draft: title and description
    pub fn validate_for_generation(&self) -> Result<(), MetadataError> {
        let missing: Vec<MetadataField> = [MetadataField::Title, MetadataField::Description]
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MetadataError { missing })
        }
    }
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self::with_institution(DEFAULT_INSTITUTION, DEFAULT_DEPARTMENT, DEFAULT_ACADEMIC_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let metadata = ProjectMetadata::default();
        assert_eq!(metadata.institution, DEFAULT_INSTITUTION);
        assert_eq!(metadata.academic_year, "2025-2026");
        assert!(metadata.title.is_empty());
        assert_eq!(metadata.supervisors.len(), 1);
        assert_eq!(metadata.jury_members.capacity(), JURY_CAPACITY);
    }

    #[test]
    fn test_set_and_read_field() {
        let mut metadata = ProjectMetadata::default();
        metadata.set_field(MetadataField::Title, "Fraud detection");
        assert_eq!(metadata.field(MetadataField::Title), "Fraud detection");
        assert_eq!(metadata.title, "Fraud detection");
    }

    #[test]
    fn test_validation_requires_title_and_description() {
        let mut metadata = ProjectMetadata::default();
        let err = metadata.validate_for_generation().unwrap_err();
        assert_eq!(
            err.missing,
            vec![MetadataField::Title, MetadataField::Description]
        );

        metadata.title = "X".to_string();
        metadata.description = "   ".to_string();
        let err = metadata.validate_for_generation().unwrap_err();
        assert_eq!(err.missing, vec![MetadataField::Description]);

        metadata.description = "Y".to_string();
        assert!(metadata.validate_for_generation().is_ok());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(MetadataField::parse("Title"), Some(MetadataField::Title));
        assert_eq!(MetadataField::parse("school"), Some(MetadataField::Department));
        assert_eq!(MetadataField::parse("year"), Some(MetadataField::AcademicYear));
        assert!("nonsense".parse::<MetadataField>().is_err());
        for field in MetadataField::ALL {
            assert_eq!(MetadataField::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_error_message_lists_labels() {
        let err = MetadataError {
            missing: vec![MetadataField::Title],
        };
        assert!(err.to_string().contains("Project title"));
    }
}
