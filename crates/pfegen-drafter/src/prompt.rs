//! Prompt construction for drafting and editing reports

use pfegen_domain::ProjectMetadata;

/// Page and typography rules every report must follow
pub const FORMATTING_RULES: &str = r#"1. Margins: top 3cm, bottom 3cm, left 4.5cm (binding), right 2cm.
2. Font: 12pt, line spacing 1.5.
3. Structure: keep this order: Dedication -> Acknowledgments -> Abstracts -> Table of contents -> List of figures -> Content.
4. Register: formal academic writing, using the authorial "we"."#;

const RESPONSE_PROTOCOL: &str = r#"RESPONSE PROTOCOL:
You act as a collaborative assistant.
1. Reply with a short textual explanation of the changes you made (e.g. "I added the methodology chapter").
2. ALWAYS include the COMPLETE, updated LaTeX code in a single markdown code block.
3. Never return only an excerpt or a diff: send back the whole file."#;

const EDIT_REMINDER: &str =
    "Reminder: give a short explanation followed by the complete LaTeX code in a code block.";

/// Build the system instruction for a drafting session
pub fn system_instruction(institution: &str, department: &str, language: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are an expert in academic writing and a seasoned LaTeX developer, \
         specialised in final-year project (PFE) reports for {} ({}).\n\n",
        department, institution
    ));

    prompt.push_str("YOUR MISSION:\n");
    prompt.push_str(
        "You receive the current LaTeX code of a report and an instruction from the user \
         (e.g. \"Add a section on Deep Learning\"). Modify the code intelligently to satisfy \
         the request without breaking the structure of the document.\n",
    );
    prompt.push_str(&format!("Write the report content in {}.\n\n", language));

    prompt.push_str("STRICT FORMATTING RULES:\n");
    prompt.push_str(FORMATTING_RULES);
    prompt.push_str("\n\n");

    prompt.push_str(RESPONSE_PROTOCOL);

    prompt
}

/// Builds the first-turn prompt from the project metadata
pub struct InitialPromptBuilder<'a> {
    metadata: &'a ProjectMetadata,
    language: &'a str,
}

impl<'a> InitialPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(metadata: &'a ProjectMetadata, language: &'a str) -> Self {
        Self { metadata, language }
    }

    /// Build the complete drafting prompt
    pub fn build(&self) -> String {
        let m = self.metadata;
        let mut prompt = String::new();

        // 1. Task
        prompt.push_str(&format!(
            "Generate a complete final-year project report in LaTeX, written in {}, \
             for the following project (reply with standard LaTeX code in a markdown block):\n\n",
            self.language
        ));

        // 2. Institutional identity
        prompt.push_str("Academic details:\n");
        prompt.push_str(&format!("University: {}\n", m.institution));
        prompt.push_str(&format!("School: {}\n", m.department));
        prompt.push_str(&format!("Year: {}\n", m.academic_year));
        prompt.push_str(&format!("Program: {}\n\n", m.program));

        // 3. Project identity
        prompt.push_str("Project details:\n");
        prompt.push_str(&format!("Title: {}\n", m.title));
        prompt.push_str(&format!("Student: {}\n", m.student_name));
        prompt.push_str(&format!("Supervisor(s): {}\n", m.supervisors.joined()));
        prompt.push_str(&format!("Jury member(s): {}\n\n", m.jury_members.joined()));

        // 4. Free text
        prompt.push_str(&format!("Context and themes: {}\n\n", m.keywords));
        prompt.push_str(&format!("Description: {}\n\n", m.description));
        prompt.push_str(&format!("Instructions: {}\n\n", m.custom_instructions));

        // 5. Formatting restated
        prompt.push_str("IMPORTANT: apply the formatting rules:\n");
        prompt.push_str(FORMATTING_RULES);
        prompt.push('\n');

        prompt
    }
}

/// Build the prompt for one edit turn
pub fn edit_prompt(current_document: &str, instruction: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("CURRENT CODE:\n");
    prompt.push_str(current_document);
    prompt.push_str("\n\n");

    prompt.push_str("USER INSTRUCTION:\n");
    prompt.push_str(instruction);
    prompt.push_str("\n\n");

    prompt.push_str(EDIT_REMINDER);

    prompt
}
