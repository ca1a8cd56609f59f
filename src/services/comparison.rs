//! Pure comparison rules between a guessed artist and the answer.

use std::cmp::Ordering;

use crate::state::game::{
    AnswerSnapshot, ArtistRecord, Comparison, FieldComparisons, FieldOutcome, GameStatus,
    MAX_GUESSES, Popularity,
};

/// Compare every tracked field of `guess` against `answer`.
///
/// `guess_number` is recorded verbatim; the caller is responsible for
/// deriving it from the guess log.
pub fn compare_artists(guess: &ArtistRecord, answer: &ArtistRecord, guess_number: u32) -> Comparison {
    let fields = FieldComparisons {
        gender: compare_text(guess.gender.as_deref(), answer.gender.as_deref()),
        genre: compare_text(guess.tag.as_deref(), answer.tag.as_deref()),
        area: compare_text(guess.area_name(), answer.area_name()),
        popularity: compare_popularity(guess.popularity.as_ref(), answer.popularity.as_ref()),
    };

    Comparison {
        is_correct: compare_text(guess.name.as_deref(), answer.name.as_deref())
            == FieldOutcome::Match,
        fields,
        answer_snapshot: AnswerSnapshot::from(answer),
        guess_artist: guess.clone(),
        guess_number,
    }
}

/// Case-insensitive equality of two categorical values.
pub fn compare_text(guess: Option<&str>, answer: Option<&str>) -> FieldOutcome {
    match (guess, answer) {
        (Some(guess), Some(answer)) if guess.to_lowercase() == answer.to_lowercase() => {
            FieldOutcome::Match
        }
        (Some(_), Some(_)) => FieldOutcome::NoMatch,
        _ => FieldOutcome::Unknown,
    }
}

/// Directional comparison of two popularity scores.
pub fn compare_popularity(guess: Option<&Popularity>, answer: Option<&Popularity>) -> FieldOutcome {
    let (Some(guess), Some(answer)) = (
        guess.and_then(Popularity::as_score),
        answer.and_then(Popularity::as_score),
    ) else {
        return FieldOutcome::Unknown;
    };

    match guess.cmp(&answer) {
        Ordering::Equal => FieldOutcome::Match,
        Ordering::Greater => FieldOutcome::Higher,
        Ordering::Less => FieldOutcome::Lower,
    }
}

/// Derive the game status after a guess.
pub fn determine_game_status(is_correct: bool, guess_number: u32) -> GameStatus {
    if is_correct {
        GameStatus::Won
    } else if guess_number >= MAX_GUESSES {
        GameStatus::Lost
    } else {
        GameStatus::Ongoing
    }
}
