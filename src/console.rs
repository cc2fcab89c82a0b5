//! Console Front End
//!
//! Line-oriented commands over a [`ChallengeService`], used by the binary.
//!
//! # Commands
//! - `issue` - Issue a challenge, printed as JSON
//! - `verify <id> <answer>` - Answer a challenge
//! - `stats` - Print cache statistics as JSON
//! - `clear` - Drop every outstanding challenge
//! - `quit` - Exit

use serde_json::json;

use crate::challenge::ChallengeService;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Issue,
    Verify { id: String, answer: String },
    Stats,
    Clear,
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns an error message for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err("Empty command".to_string());
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "issue" => Command::Issue,
            "verify" => match (parts.next(), parts.next()) {
                (Some(id), Some(answer)) => Command::Verify {
                    id: id.to_string(),
                    answer: answer.to_string(),
                },
                _ => return Err("Usage: verify <id> <answer>".to_string()),
            },
            "stats" => Command::Stats,
            "clear" => Command::Clear,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command: {other}")),
        };

        if parts.next().is_some() {
            return Err(format!("Too many arguments for '{name}'"));
        }
        Ok(command)
    }
}

/// Runs `command` against `service` and returns the line to print.
///
/// `Quit` is handled by the caller and yields an empty string.
pub async fn execute(service: &ChallengeService, command: Command) -> String {
    match command {
        Command::Issue => match service.issue().await {
            Ok(issued) => json!(issued).to_string(),
            Err(err) => json!({ "error": err.to_string() }).to_string(),
        },
        Command::Verify { id, answer } => match service.verify(&id, &answer).await {
            Ok(()) => json!({ "message": "Captcha verified successfully" }).to_string(),
            Err(err) => json!({ "error": err.to_string() }).to_string(),
        },
        Command::Stats => {
            let stats = service.cache().stats().await;
            json!({
                "stats": stats,
                "hit_rate": stats.hit_rate(),
                "max_entries": service.cache().max_size().await,
            })
            .to_string()
        }
        Command::Clear => {
            service.cache().clear().await;
            json!({ "message": "Cache cleared" }).to_string()
        }
        Command::Quit => String::new(),
    }
}
