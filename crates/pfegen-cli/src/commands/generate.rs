//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::commands::export::save_document;
use crate::error::Result;
use crate::metadata_file::load_metadata;
use crate::output::Formatter;
use pfegen_domain::ProjectMetadata;
use pfegen_drafter::{DraftStudio, EditOutcome};
use pfegen_llm::ChatProvider;

/// Request the first draft while showing a spinner.
pub async fn run_generation<P: ChatProvider>(
    studio: &DraftStudio<P>,
    metadata: &ProjectMetadata,
    formatter: &Formatter,
) -> Result<()> {
    // Validate up front so the spinner never flashes for a rejected form
    metadata
        .validate_for_generation()
        .map_err(pfegen_drafter::DraftError::from)?;

    let spinner = formatter.spinner("Generating the report structure...");
    let result = studio.generate(metadata).await;
    spinner.finish_and_clear();
    result?;

    Ok(())
}

/// Send one edit instruction while showing a spinner.
pub async fn run_edit<P: ChatProvider>(
    studio: &DraftStudio<P>,
    instruction: &str,
    formatter: &Formatter,
) -> Result<EditOutcome> {
    let spinner = formatter.spinner("Updating the document...");
    let result = studio.send_edit(instruction).await;
    spinner.finish_and_clear();
    Ok(result?)
}

/// Execute the one-shot generate command: draft, apply each edit in order,
/// then print or save the final document.
pub async fn execute_generate<P: ChatProvider>(
    args: GenerateArgs,
    studio: &DraftStudio<P>,
    base: &ProjectMetadata,
    formatter: &Formatter,
) -> Result<()> {
    let metadata = load_metadata(&args.metadata, base)?;

    run_generation(studio, &metadata, formatter).await?;
    eprintln!("{}", formatter.success("Initial draft generated"));

    for instruction in &args.edits {
        match run_edit(studio, instruction, formatter).await? {
            EditOutcome::Applied { summary } => {
                eprintln!("{}", formatter.assistant(&summary));
            }
            EditOutcome::Failed { reason } => {
                tracing::warn!(%reason, instruction = %instruction, "Edit failed");
                eprintln!(
                    "{}",
                    formatter.warning(&format!("Edit '{}' failed: {}", instruction, reason))
                );
            }
        }
    }

    let document = studio.document();
    match args.output {
        Some(path) => {
            save_document(&document, &path)?;
            eprintln!("{}", formatter.success(&format!("Saved to {}", path.display())));
        }
        None => println!("{}", document),
    }

    Ok(())
}
