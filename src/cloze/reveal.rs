//! Progressive reveal of cloze placeholders

use super::lexer::{lex, Result, Token};

/// Hidden -> first letter -> full answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Hidden,
    Partial,
    Full,
}

impl RevealState {
    pub fn next(self) -> Self {
        match self {
            Self::Hidden => Self::Partial,
            Self::Partial | Self::Full => Self::Full,
        }
    }
}

/// Reveal state for every placeholder of one passage
#[derive(Debug, Clone)]
pub struct ClozeSession {
    tokens: Vec<Token>,
    states: Vec<RevealState>,
    cursor: usize,
}

impl ClozeSession {
    pub fn new(tokens: Vec<Token>) -> Self {
        let count = tokens
            .iter()
            .filter(|t| matches!(t, Token::Cloze { .. }))
            .count();
        Self {
            tokens,
            states: vec![RevealState::Hidden; count],
            cursor: 0,
        }
    }

    pub fn from_markup(markup: &str) -> Result<Self> {
        Ok(Self::new(lex(markup)?))
    }

    pub fn cloze_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, index: usize) -> Option<RevealState> {
        self.states.get(index).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|s| *s == RevealState::Full)
    }

    /// Keyboard step: advance the current placeholder one state, moving on
    /// (and wrapping) once it is fully revealed. Returns the placeholder
    /// that changed, or `None` when everything is revealed.
    pub fn advance(&mut self) -> Option<usize> {
        let count = self.states.len();
        let index = (0..count)
            .map(|offset| (self.cursor + offset) % count)
            .find(|&i| self.states[i] != RevealState::Full)?;

        self.states[index] = self.states[index].next();
        self.cursor = if self.states[index] == RevealState::Full {
            (index + 1) % count
        } else {
            index
        };
        Some(index)
    }

    /// Click on a specific placeholder
    pub fn reveal(&mut self, index: usize) -> Option<RevealState> {
        let state = self.states.get_mut(index)?;
        *state = state.next();
        Some(*state)
    }

    /// Passage with placeholders shown according to their state
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut index = 0;
        for token in &self.tokens {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Cloze { answer, hint } => {
                    let state = self.states[index];
                    match state {
                        RevealState::Hidden => out.push_str("[…]"),
                        RevealState::Partial => {
                            out.push('[');
                            out.push_str(&partial(answer));
                            out.push(']');
                        }
                        RevealState::Full => out.push_str(answer),
                    }
                    if let Some(hint) = hint.as_ref().filter(|_| state != RevealState::Full) {
                        out.push_str(&format!(" ({})", hint));
                    }
                    index += 1;
                }
            }
        }
        out
    }
}

/// First character followed by an ellipsis
pub fn partial(answer: &str) -> String {
    let mut chars = answer.trim_start().chars();
    match chars.next() {
        Some(first) => format!("{}…", first),
        None => "…".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_walks_every_state() {
        let mut session = ClozeSession::from_markup("A: Hallo [Cześć]\nB: Tschüss [Pa]").unwrap();
        assert_eq!(session.cloze_count(), 2);
        assert_eq!(session.render_text(), "A: Hallo […]\nB: Tschüss […]");

        assert_eq!(session.advance(), Some(0));
        assert_eq!(session.render_text(), "A: Hallo [C…]\nB: Tschüss […]");
        assert_eq!(session.advance(), Some(0));
        assert_eq!(session.state(0), Some(RevealState::Full));
        assert_eq!(session.advance(), Some(1));
        assert_eq!(session.advance(), Some(1));

        assert!(session.is_complete());
        assert_eq!(session.render_text(), "A: Hallo Cześć\nB: Tschüss Pa");
        assert_eq!(session.advance(), None);
    }

    #[test]
    fn test_advance_skips_clicked_placeholders() {
        let mut session = ClozeSession::from_markup("[a] [b] [c]").unwrap();
        session.reveal(1);
        session.reveal(1);
        assert_eq!(session.state(1), Some(RevealState::Full));

        session.advance();
        assert_eq!(session.advance(), Some(0));
        assert_eq!(session.advance(), Some(2));
    }

    #[test]
    fn test_advance_wraps_to_unrevealed() {
        let mut session = ClozeSession::from_markup("[a] [b]").unwrap();
        session.reveal(0);
        session.advance(); // a -> full, cursor on b
        session.advance(); // b -> partial
        session.advance(); // b -> full, cursor wraps
        assert!(session.is_complete());
    }

    #[test]
    fn test_reveal_is_bounded() {
        let mut session = ClozeSession::from_markup("[kot](animal)").unwrap();
        assert_eq!(session.render_text(), "[…] (animal)");
        assert_eq!(session.reveal(0), Some(RevealState::Partial));
        assert_eq!(session.reveal(0), Some(RevealState::Full));
        assert_eq!(session.reveal(0), Some(RevealState::Full));
        assert_eq!(session.reveal(5), None);
        assert_eq!(session.render_text(), "kot");
    }

    #[test]
    fn test_no_placeholders() {
        let mut session = ClozeSession::from_markup("nur Text").unwrap();
        assert!(session.is_complete());
        assert_eq!(session.advance(), None);
    }

    #[test]
    fn test_partial() {
        assert_eq!(partial("źdźbło"), "ź…");
        assert_eq!(partial(" kot"), "k…");
    }
}
