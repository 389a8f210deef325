//! Cloze passages
//!
//! Practice dialogs are stored as markup where `[answer]` (optionally followed
//! by `(hint)`) marks a placeholder the learner uncovers step by step.

mod html;
mod lexer;
mod reveal;

pub use html::{render_html_page, render_passage};
pub use lexer::{lex, lex_lines, ClozeError, Token};
pub use reveal::{partial, ClozeSession, RevealState};
