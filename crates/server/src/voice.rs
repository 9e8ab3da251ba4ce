//! Voice command parsing. The result is advisory: a client confirms it and
//! then calls the ordinary transfer or conversion endpoint.

use advisor::Language;
use api_types::voice::{VoiceCommand, VoiceParameters, VoiceResult};
use axum::{Extension, Json, extract::State};

use crate::{
    Payload, ServerError,
    server::{Principal, ServerState},
};

pub async fn process(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<VoiceCommand>,
) -> Result<Json<VoiceResult>, ServerError> {
    let transcript = payload.audio_text.trim();
    if transcript.is_empty() {
        return Err(ServerError::Generic("audioText must not be empty".to_string()));
    }
    let language = payload
        .language
        .as_deref()
        .map(Language::parse)
        .unwrap_or_default();

    let parsed = state.advisor.parse_voice(transcript, language).await;
    tracing::info!(
        user_id = principal.user_id(),
        action = %parsed.action,
        confidence = parsed.confidence,
        "voice command parsed"
    );

    Ok(Json(VoiceResult {
        intent: parsed.intent.as_str().to_string(),
        action: parsed.action,
        parameters: VoiceParameters {
            amount: parsed.parameters.amount,
            currency: parsed.parameters.currency,
            recipient: parsed.parameters.recipient,
        },
        confidence: parsed.confidence,
    }))
}
