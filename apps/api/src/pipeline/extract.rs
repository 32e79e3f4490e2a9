//! Stage 1: extracts a `UserProfile` from the user's free-text request.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::structured::{call_structured, Parsed, Schema};
use crate::llm_client::LanguageModel;
use crate::models::profile::UserProfile;
use crate::pipeline::prompts::{EXTRACT_PROMPT, EXTRACT_SYSTEM};

/// Shown to the user when the request yields no health description.
pub const INVALID_REQUEST_MESSAGE: &str = "Sorry, please write your request again. \
    Describe your health problems, allergies and intolerances clearly, using correct medical terms.";

/// Runs the extraction stage.
///
/// Rejects the request with `AppError::InvalidRequest` when `health_info` is absent,
/// which is also how the model signals a nonsensical or joke message.
pub async fn extract_profile(
    model: &dyn LanguageModel,
    user_message: &str,
) -> Result<Parsed<UserProfile>, AppError> {
    let user_message = user_message.trim();
    if user_message.is_empty() {
        return Err(AppError::Validation(
            "request_text cannot be empty".to_string(),
        ));
    }

    let prompt = EXTRACT_PROMPT.render(&[
        ("schema", UserProfile::SHAPE),
        ("user_message", user_message),
    ])?;

    let parsed = call_structured::<UserProfile>(model, "extract", &prompt, EXTRACT_SYSTEM).await?;
    let profile = &parsed.value;

    if !profile.has_health_info() {
        info!("Extraction found no health description, rejecting request");
        return Err(AppError::InvalidRequest(INVALID_REQUEST_MESSAGE.to_string()));
    }

    info!(
        "Profile extracted: {} allergies, {} intolerances, {} excluded, {} added",
        profile.allergies.len(),
        profile.intolerances.len(),
        profile.exclude.len(),
        profile.add.len()
    );

    Ok(parsed)
}
