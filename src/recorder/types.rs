use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time::Timestamp;

pub const TURN_HEADER: &[&str] = &["User Input", "Chatbot Response", "Timestamp"];
pub const FEEDBACK_HEADER: &[&str] = &["User Input", "Chatbot Response", "Timestamp", "Feedback", "Rating"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    Good,
    Neutral,
    Bad,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Good => "Good",
            Feedback::Neutral => "Neutral",
            Feedback::Bad => "Bad",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeedback(pub String);

impl fmt::Display for UnknownFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown feedback '{}'", self.0)
    }
}

impl std::error::Error for UnknownFeedback {}

impl FromStr for Feedback {
    type Err = UnknownFeedback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" | "g" => Ok(Feedback::Good),
            "neutral" | "n" => Ok(Feedback::Neutral),
            "bad" | "b" => Ok(Feedback::Bad),
            _ => Err(UnknownFeedback(s.to_string())),
        }
    }
}

/// Which durable log a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    Turns,
    Feedback,
}

/// One row of the turn log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    #[serde(rename = "User Input")]
    pub user_input: String,
    #[serde(rename = "Chatbot Response")]
    pub response: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: Timestamp,
}

/// One row of the feedback log. `rating` is part of the schema but never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(rename = "User Input")]
    pub user_input: String,
    #[serde(rename = "Chatbot Response")]
    pub response: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: Timestamp,
    #[serde(rename = "Feedback")]
    pub feedback: Feedback,
    #[serde(rename = "Rating", default)]
    pub rating: Option<u8>,
}
