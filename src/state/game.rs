use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of guesses before a game is lost.
pub const MAX_GUESSES: u32 = 7;

/// Normalized artist metadata assembled from the upstream providers.
///
/// Every field is optional: upstream data is patchy and the comparison treats
/// missing values as `unknown` rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ArtistRecord {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub gender: Option<String>,
    #[serde(rename = "life-span")]
    pub life_span: Option<LifeSpan>,
    pub area: Option<Area>,
    /// Dominant genre tag.
    pub tag: Option<String>,
    #[serde(rename = "spotify popularity")]
    pub popularity: Option<Popularity>,
}

impl ArtistRecord {
    /// Name of the area the artist is associated with, if known.
    pub fn area_name(&self) -> Option<&str> {
        self.area.as_ref().and_then(|area| area.name.as_deref())
    }
}

/// Geographic area attached to an artist.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Area {
    pub name: Option<String>,
}

/// Activity period of an artist, as reported by MusicBrainz.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct LifeSpan {
    pub begin: Option<String>,
    pub end: Option<String>,
    pub ended: Option<bool>,
}

/// Popularity score as received: a number from Spotify, or a string from
/// hand-written fixtures. Parsed lazily by the comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(untagged)]
pub enum Popularity {
    Score(i64),
    Text(String),
}

impl Popularity {
    /// Integer value of the score, `None` when it does not parse.
    pub fn as_score(&self) -> Option<i64> {
        match self {
            Popularity::Score(value) => Some(*value),
            Popularity::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<i64> for Popularity {
    fn from(value: i64) -> Self {
        Popularity::Score(value)
    }
}

/// Outcome of comparing one field of a guess with the answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldOutcome {
    Match,
    NoMatch,
    /// Guess value is greater than the answer.
    Higher,
    /// Guess value is lower than the answer.
    Lower,
    /// One side is missing or unparsable.
    Unknown,
}

/// Per-field outcomes reported back to the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct FieldComparisons {
    pub gender: FieldOutcome,
    pub genre: FieldOutcome,
    pub area: FieldOutcome,
    pub popularity: FieldOutcome,
}

/// Flattened view of the answer, revealed once the game is over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AnswerSnapshot {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub genre: Option<String>,
    pub area: Option<String>,
    pub popularity: Option<Popularity>,
}

impl From<&ArtistRecord> for AnswerSnapshot {
    fn from(artist: &ArtistRecord) -> Self {
        Self {
            name: artist.name.clone(),
            gender: artist.gender.clone(),
            genre: artist.tag.clone(),
            area: artist.area_name().map(str::to_owned),
            popularity: artist.popularity.clone(),
        }
    }
}

/// Result of a single guess, stored in the guess log of its game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comparison {
    pub is_correct: bool,
    pub fields: FieldComparisons,
    pub answer_snapshot: AnswerSnapshot,
    pub guess_artist: ArtistRecord,
    /// 1-based position of this guess in the game.
    pub guess_number: u32,
}

/// Lifecycle status derived from a comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    Ongoing,
    Won,
    Lost,
}

impl GameStatus {
    /// Whether the answer may be revealed to the player.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_record_uses_upstream_json_keys() {
        let json = serde_json::json!({
            "name": "Pitbull",
            "gender": "male",
            "area": {"name": "United States"},
            "tag": "dance-pop",
            "spotify popularity": 85
        });

        let artist: ArtistRecord = serde_json::from_value(json).unwrap();
        assert_eq!(artist.area_name(), Some("United States"));
        assert_eq!(artist.popularity, Some(Popularity::Score(85)));
        assert!(artist.kind.is_none());
    }

    #[test]
    fn popularity_text_parses_when_numeric() {
        assert_eq!(Popularity::Text(" 42 ".into()).as_score(), Some(42));
        assert_eq!(Popularity::Text("very".into()).as_score(), None);
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(GameStatus::Ongoing).unwrap(),
            serde_json::json!("ONGOING")
        );
        assert_eq!(
            serde_json::to_value(FieldOutcome::NoMatch).unwrap(),
            serde_json::json!("no_match")
        );
    }
}
