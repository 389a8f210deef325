//! Cloze markup lexer
//!
//! Markup is literal text interleaved with placeholders:
//! `B: Im Garten. [W ogrodzie.](place)` has one placeholder with answer
//! `W ogrodzie.` and hint `place`. The hint is optional.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Cloze { answer: String, hint: Option<String> },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClozeError {
    #[error("Unclosed '[' at byte {offset}")]
    UnclosedBracket { offset: usize },

    #[error("Unclosed '(' at byte {offset}")]
    UnclosedHint { offset: usize },

    #[error("Empty placeholder at byte {offset}")]
    EmptyCloze { offset: usize },
}

impl ClozeError {
    fn shifted(self, base: usize) -> Self {
        match self {
            Self::UnclosedBracket { offset } => Self::UnclosedBracket { offset: offset + base },
            Self::UnclosedHint { offset } => Self::UnclosedHint { offset: offset + base },
            Self::EmptyCloze { offset } => Self::EmptyCloze { offset: offset + base },
        }
    }
}

pub type Result<T> = std::result::Result<T, ClozeError>;

/// Split markup into literal runs and placeholders.
pub fn lex(markup: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(rel) = markup[pos..].find('[') {
        let open = pos + rel;
        literal.push_str(&markup[pos..open]);

        let body_start = open + 1;
        let rest = &markup[body_start..];
        // A placeholder ends at the first ']' on the same line, with no nested '['
        let close = match rest.find(['[', ']', '\n']) {
            Some(i) if rest[i..].starts_with(']') => body_start + i,
            _ => return Err(ClozeError::UnclosedBracket { offset: open }),
        };

        let answer = &markup[body_start..close];
        if answer.trim().is_empty() {
            return Err(ClozeError::EmptyCloze { offset: open });
        }
        pos = close + 1;

        let mut hint = None;
        if markup[pos..].starts_with('(') {
            let hint_start = pos + 1;
            let end = markup[hint_start..]
                .find([')', '\n'])
                .map(|i| hint_start + i)
                .filter(|&end| markup[end..].starts_with(')'))
                .ok_or(ClozeError::UnclosedHint { offset: pos })?;
            let text = &markup[hint_start..end];
            if !text.trim().is_empty() {
                hint = Some(text.to_string());
            }
            pos = end + 1;
        }

        if !literal.is_empty() {
            tokens.push(Token::Text(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Cloze {
            answer: answer.to_string(),
            hint,
        });
    }

    literal.push_str(&markup[pos..]);
    if !literal.is_empty() {
        tokens.push(Token::Text(literal));
    }
    Ok(tokens)
}

/// Lex each line separately, reporting errors with offsets into `markup`.
pub fn lex_lines(markup: &str) -> Result<Vec<Vec<Token>>> {
    let mut lines = Vec::new();
    let mut base = 0;
    for line in markup.split('\n') {
        lines.push(lex(line).map_err(|e| e.shifted(base))?);
        base += line.len() + 1;
    }
    Ok(lines)
}
