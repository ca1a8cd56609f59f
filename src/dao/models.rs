use serde::{Deserialize, Serialize};

use crate::state::game::{ArtistRecord, Comparison};

/// Game record persisted per session: the answer and the ordered guess log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Artist the player has to find.
    pub answer: ArtistRecord,
    /// Comparisons produced so far, oldest first.
    #[serde(default)]
    pub guesses: Vec<Comparison>,
}

impl GameEntity {
    /// Fresh game with an empty guess log.
    pub fn new(answer: ArtistRecord) -> Self {
        Self {
            answer,
            guesses: Vec::new(),
        }
    }
}
