//! Static HTML page for a cloze passage.
//!
//! Each placeholder becomes a `.cloze` span carrying its answer in
//! `data-original`. Clicking a span, or pressing ArrowRight, reveals the
//! first letter and then the whole answer.

use std::sync::OnceLock;

use regex::Regex;

use super::lexer::{lex_lines, Result, Token};

const STYLE: &str = r#"
        .cloze {
            cursor: pointer;
            background-color: #f0f0f0;
            padding: 0 4px;
            border-radius: 3px;
        }

        html, body {
            font-size: 21px;
            max-width: 32rem;
            line-height: 1.5;
            padding: 1rem;
            font-family: Arial, sans-serif;
        }

        br {
            margin-bottom: 16px;
        }

        .revealed {
            font-style: italic;
            background-color: hsl(56, 100%, 80%);
            padding: 5px;
        }

        .hint {
            color: #999;
            font-size: 0.9em;
            margin-left: 0.5em;
        }
"#;

const SCRIPT: &str = r#"
        let clozeElements = [];
        let currentClozeIndex = 0;

        document.addEventListener('DOMContentLoaded', () => {
            clozeElements = Array.from(document.querySelectorAll('.cloze'));

            document.addEventListener('keydown', (event) => {
                if (event.key === 'ArrowRight') {
                    event.preventDefault();
                    revealNextCloze();
                }
            });
        });

        function step(element) {
            const original = element.getAttribute('data-original');
            const state = element.getAttribute('data-revealed');
            if (!state) {
                element.textContent = original.charAt(0) + '…';
                element.setAttribute('data-revealed', 'partial');
            } else if (state === 'partial') {
                element.textContent = original;
                element.classList.remove('cloze');
                element.classList.add('revealed');
                element.setAttribute('data-revealed', 'full');
            }
        }

        function revealNextCloze() {
            for (let i = 0; i < clozeElements.length; i++) {
                const index = (currentClozeIndex + i) % clozeElements.length;
                const element = clozeElements[index];
                if (element.getAttribute('data-revealed') === 'full') {
                    continue;
                }
                step(element);
                currentClozeIndex = element.getAttribute('data-revealed') === 'full'
                    ? (index + 1) % clozeElements.length
                    : index;
                return;
            }
        }

        function revealCloze(element) {
            step(element);
        }
"#;

fn speaker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[A-Z]:").unwrap())
}

/// Render the passage body: one line per dialog turn, placeholders as spans.
pub fn render_passage(markup: &str) -> Result<String> {
    let lines = lex_lines(markup)?;
    let mut html = String::new();

    for (line, tokens) in markup.split('\n').zip(lines) {
        if speaker_re().is_match(line) {
            html.push_str("<br>");
        }
        for token in tokens {
            match token {
                Token::Text(text) => html.push_str(&html_escape::encode_text(&text)),
                Token::Cloze { answer, hint } => {
                    html.push_str(&format!(
                        r#"<span class="cloze" onclick="revealCloze(this)" data-original="{}">[…]</span>"#,
                        html_escape::encode_double_quoted_attribute(&answer)
                    ));
                    if let Some(hint) = hint {
                        html.push_str(&format!(
                            r#"<span class="hint">{}</span>"#,
                            html_escape::encode_text(&hint)
                        ));
                    }
                }
            }
        }
        html.push('\n');
    }

    Ok(html)
}

/// Full standalone page
pub fn render_html_page(markup: &str) -> Result<String> {
    let passage = render_passage(markup)?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Cloze Text Example</title>
    <style>{style}</style>
    <script>{script}</script>
</head>
<body>
    <div>{passage}</div>
</body>
</html>"#,
        style = STYLE,
        script = SCRIPT,
        passage = passage
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloze::ClozeError;

    #[test]
    fn test_render_passage() {
        let html = render_passage("A: Wo? <tag> [Gdzie \"tu\"?]\nB: Hier. [Tutaj.](place)").unwrap();

        assert!(html.starts_with("<br>A: Wo? &lt;tag&gt; "));
        assert!(html.contains(r#"data-original="Gdzie &quot;tu&quot;?""#));
        assert!(html.contains("\n<br>B: Hier. "));
        assert!(html.contains(r#"<span class="hint">place</span>"#));
        assert_eq!(html.matches(r#"class="cloze""#).count(), 2);
        assert!(!html.contains("Tutaj.</span>"));
    }

    #[test]
    fn test_continuation_line_has_no_break() {
        let html = render_passage("extra line [x]").unwrap();
        assert!(!html.contains("<br>"));
    }

    #[test]
    fn test_page_contains_script_and_passage() {
        let page = render_html_page("A: Hallo [Cześć]").unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("function revealNextCloze()"));
        assert!(page.contains(r#"data-original="Cześć""#));
    }

    #[test]
    fn test_malformed_markup_is_reported() {
        let err = render_html_page("A: Hallo [Cześć").unwrap_err();
        assert_eq!(err, ClozeError::UnclosedBracket { offset: 9 });
    }
}
