//! Request orchestration: validate, build the prompt, call the model once,
//! normalize the output. Transport status codes are chosen by the caller.

use serde::Serialize;
use tracing::{debug, info};

use crate::bridge::{GenerationOptions, GenerativeModel};
use crate::category::Category;
use crate::error::AppError;
use crate::mode::detect_mode;
use crate::normalize::{parse_structured, ClassifiedAnswer};
use crate::prompt::{build_classification_prompt, build_prompt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeResponse {
    pub category: String,
    pub detected: Option<String>,
    pub response: String,
}

fn validate<'a>(text: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

/// Schema-constrained variant: the model classifies and answers in one JSON
/// object.
pub async fn ask(model: &dyn GenerativeModel, message: &str) -> Result<ClassifiedAnswer, AppError> {
    let message = validate(message, "Message")?;

    let prompt = build_classification_prompt(message);
    let raw = model
        .generate(&prompt, &GenerationOptions::classified_answer())
        .await?;
    debug!(bytes = raw.len(), "model replied");

    let answer = parse_structured(&raw)?;
    info!(category = %answer.category, "classified request");
    Ok(answer)
}

/// Free-text variant: a mode-specific prompt, with the mode tag stripped from
/// auto-mode output.
pub async fn respond(
    model: &dyn GenerativeModel,
    prompt: &str,
    category: Category,
) -> Result<ModeResponse, AppError> {
    let prompt = validate(prompt, "Prompt")?;

    let instruction = build_prompt(category, prompt);
    let raw = model
        .generate(&instruction, &GenerationOptions::plain_text())
        .await?;
    debug!(bytes = raw.len(), "model replied");

    let detection = detect_mode(&raw, category);
    info!(%category, detected = ?detection.detected, "responded");
    Ok(ModeResponse {
        category: category.to_string(),
        detected: detection.detected,
        response: detection.text,
    })
}
