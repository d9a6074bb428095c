//! Outbound client commands.
//!
//! Commands share the `{"type": <tag>, "data": <object>}` envelope with
//! inbound events. Only two exist: asking the authority to start the round,
//! and submitting an answer.

use serde::{Deserialize, Serialize};

/// One outbound frame to the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Request the round to begin (any participant may send it).
    StartGame {},
    /// Submit an answer to the active question.
    ///
    /// The answer is a float because the authority validates with a 0.01
    /// tolerance (division questions can have fractional answers).
    Answer { question_id: String, answer: f64 },
}

/// Serialize a command into its wire envelope.
pub fn encode_command(command: &ClientCommand) -> Result<String, serde_json::Error> {
    serde_json::to_string(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_start_game() {
        let text = encode_command(&ClientCommand::StartGame {}).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "start_game");
        assert!(value["data"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_encode_answer() {
        let text = encode_command(&ClientCommand::Answer {
            question_id: "q-42".to_string(),
            answer: 6.5,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "answer");
        assert_eq!(value["data"]["question_id"], "q-42");
        assert_eq!(value["data"]["answer"], 6.5);
    }

    #[test]
    fn test_command_round_trip() {
        let command = ClientCommand::Answer {
            question_id: "q-1".to_string(),
            answer: 13.0,
        };
        let decoded: ClientCommand =
            serde_json::from_str(&encode_command(&command).unwrap()).unwrap();
        assert_eq!(decoded, command);
    }
}
