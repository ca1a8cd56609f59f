use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::validate_guess_text,
    services::comparison::determine_game_status,
    state::game::{
        AnswerSnapshot, ArtistRecord, Comparison, FieldComparisons, GameStatus, MAX_GUESSES,
    },
};

/// Body of `POST /guess`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GuessRequest {
    /// Free-text artist name. Numbers and booleans are taken as their text.
    #[serde(default, deserialize_with = "guess_text")]
    pub guess: String,
}

/// Accept any scalar as guess text; `null`, arrays and objects read as blank.
fn guess_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

impl Validate for GuessRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_guess_text(&self.guess) {
            errors.add("guess", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Acknowledgement of `GET /new-game`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewGameResponse {
    pub ok: bool,
}

/// Comparison as shown to the player: the answer stays hidden.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonView {
    pub is_correct: bool,
    pub fields: FieldComparisons,
    pub guess_artist: ArtistRecord,
    pub guess_number: u32,
}

/// Response of `POST /guess`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuessResponse {
    pub status: GameStatus,
    pub is_correct: bool,
    pub comparison: ComparisonView,
    pub guess_number: u32,
    pub max_guesses: u32,
    /// Revealed once the game is won or lost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerSnapshot>,
}

impl From<Comparison> for GuessResponse {
    fn from(comparison: Comparison) -> Self {
        let status = determine_game_status(comparison.is_correct, comparison.guess_number);
        let answer = status.is_over().then_some(comparison.answer_snapshot);

        Self {
            status,
            is_correct: comparison.is_correct,
            guess_number: comparison.guess_number,
            max_guesses: MAX_GUESSES,
            answer,
            comparison: ComparisonView {
                is_correct: comparison.is_correct,
                fields: comparison.fields,
                guess_artist: comparison.guess_artist,
                guess_number: comparison.guess_number,
            },
        }
    }
}

/// Query string of `GET /musicbrain/search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Artist name to look up.
    pub q: Option<String>,
}
