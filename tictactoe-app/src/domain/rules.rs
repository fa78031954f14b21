//! Business rules shared by the save workflows and the inline field validators.
//!
//! Every check returns the user-facing message of the first violated rule, or
//! `None` when the value is acceptable. Names and descriptions are checked in
//! their trimmed form.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::domain::PlayerId;

pub const PLAYER_NAME_MAX_LEN: usize = 50;

#[derive(Validate)]
struct PlayerNameLength {
    #[validate(length(min = 2, max = 50))]
    name: String,
}

#[derive(Validate)]
struct AchievementNameLength {
    #[validate(length(min = 2))]
    name: String,
}

#[derive(Validate)]
struct DescriptionLength {
    #[validate(length(min = 5))]
    description: String,
}

pub fn player_name_problem(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return Some("Name is required".to_string());
    }
    let rule = PlayerNameLength {
        name: name.to_string(),
    };
    match rule.validate() {
        Ok(()) => None,
        Err(_) if name.chars().count() > PLAYER_NAME_MAX_LEN => Some(format!(
            "Name must be at most {} characters",
            PLAYER_NAME_MAX_LEN
        )),
        Err(_) => Some("Name must be at least 2 characters".to_string()),
    }
}

pub fn match_count_problem(match_count: i32) -> Option<String> {
    if match_count < 0 {
        Some("Match count cannot be negative".to_string())
    } else {
        None
    }
}

/// Parses the free-text match count of a form.
pub fn parse_match_count(text: &str) -> Result<i32, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Match count is required".to_string());
    }
    let count = text
        .parse::<i32>()
        .map_err(|_| "Match count must be a whole number".to_string())?;
    match match_count_problem(count) {
        Some(problem) => Err(problem),
        None => Ok(count),
    }
}

pub fn achievement_name_problem(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return Some("Name is required".to_string());
    }
    let rule = AchievementNameLength {
        name: name.to_string(),
    };
    match rule.validate() {
        Ok(()) => None,
        Err(_) => Some("Name must be at least 2 characters".to_string()),
    }
}

pub fn achievement_description_problem(description: &str) -> Option<String> {
    let description = description.trim();
    if description.is_empty() {
        return Some("Description is required".to_string());
    }
    let rule = DescriptionLength {
        description: description.to_string(),
    };
    match rule.validate() {
        Ok(()) => None,
        Err(_) => Some("Description must be at least 5 characters".to_string()),
    }
}

pub fn same_players_problem(player1: PlayerId, player2: PlayerId) -> Option<String> {
    if player1 == player2 {
        Some("A player cannot play against themselves".to_string())
    } else {
        None
    }
}

pub fn winner_problem(
    winner: Option<PlayerId>,
    player1: PlayerId,
    player2: PlayerId,
) -> Option<String> {
    match winner {
        Some(winner) if winner != player1 && winner != player2 => {
            Some("The winner must be one of the match players".to_string())
        }
        _ => None,
    }
}

pub fn date_problem(date: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    if date > now {
        Some("The match date cannot be in the future".to_string())
    } else {
        None
    }
}
