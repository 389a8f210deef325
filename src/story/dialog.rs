//! Structured dialog returned by the generator

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{Result, StoryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLine {
    /// "A" or "B"
    pub speaker: String,
    pub german: String,
    pub polish: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub lines: Vec<DialogLine>,
}

impl Dialog {
    /// JSON schema for structured output
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "lines": {
                    "type": "array",
                    "description": "List of dialog lines",
                    "items": {
                        "type": "object",
                        "properties": {
                            "speaker": { "type": "string", "description": "Speaker identifier (A or B)" },
                            "german": { "type": "string", "description": "German sentence" },
                            "polish": { "type": "string", "description": "Polish translation" }
                        },
                        "required": ["speaker", "german", "polish"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["lines"],
            "additionalProperties": false
        })
    }

    /// Parse generator output, tolerating a fenced ```json block
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let body = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.trim_end().strip_suffix("```"))
            .unwrap_or(trimmed);

        let dialog: Dialog = serde_json::from_str(body.trim())?;
        if dialog.lines.is_empty() {
            return Err(StoryError::InvalidResponse("dialog has no lines".to_string()));
        }
        Ok(dialog)
    }

    /// Render as cloze markup: `A: German sentence [Polish translation]`
    pub fn to_markup(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "{}: {} [{}]",
                    clean(&line.speaker),
                    clean(&line.german),
                    clean(&line.polish)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One line of plain text; brackets would be read as cloze markup
fn clean(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('[', "(")
        .replace(']', ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{"lines":[
        {"speaker":"A","german":"Wo ist der Hund?","polish":"Gdzie jest pies?"},
        {"speaker":"B","german":"Im Garten.","polish":"W ogrodzie."}
    ]}"#;

    #[test]
    fn test_parse_and_render() {
        let dialog = Dialog::parse(RESPONSE).unwrap();
        assert_eq!(dialog.lines.len(), 2);
        assert_eq!(
            dialog.to_markup(),
            "A: Wo ist der Hund? [Gdzie jest pies?]\nB: Im Garten. [W ogrodzie.]"
        );
    }

    #[test]
    fn test_parse_fenced_block() {
        let fenced = format!("```json\n{}\n```", RESPONSE);
        assert_eq!(Dialog::parse(&fenced).unwrap().lines.len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(matches!(
            Dialog::parse(r#"{"lines":[]}"#).unwrap_err(),
            StoryError::InvalidResponse(_)
        ));
        assert!(matches!(Dialog::parse("A: Hallo").unwrap_err(), StoryError::Json(_)));
    }

    #[test]
    fn test_markup_stays_on_one_line() {
        let dialog = Dialog {
            lines: vec![DialogLine {
                speaker: "A".to_string(),
                german: "Das [ist]\nneu".to_string(),
                polish: "To jest  nowe".to_string(),
            }],
        };
        assert_eq!(dialog.to_markup(), "A: Das (ist) neu [To jest nowe]");
    }
}
