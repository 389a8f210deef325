//! Prompt text for practice dialogs

use crate::cards::VocabularyItem;

pub const SYSTEM_PROMPT: &str = "You are an expert in dialog creation for A1 beginner level learners of Polish. \
Create a dialog with a clear structure.";

/// Vocabulary items as `front,back` joined by `;`
pub fn format_vocabulary(items: &[VocabularyItem]) -> String {
    items
        .iter()
        .map(|item| format!("{},{}", item.front_text, item.back_text))
        .collect::<Vec<_>>()
        .join(";")
}

pub fn build_prompt(items: &[VocabularyItem]) -> String {
    format!(
        r#"Create a natural dialogue between two people (A and B) following these strict rules:
1. Input Vocabulary Format:
- Items are provided as front,back pairs: German sentence,Polish translation
- Items are separated by ';'
- Vocabulary items serve as INSPIRATION for unique dialogue content

2. Dialogue Creation Guidelines:
- The dialog is in German AND Polish.
- Every line has a German sentence and its Polish translation
- Each line has speaker A or B
- Keep a natural, logical conversation flow
- USE ALL provided vocabulary items exactly once
- Distribute vocabulary items RANDOMLY throughout the dialogue
- Create ENTIRELY NEW contexts and examples:
    - NO direct repetition of input scenarios
    - Transform the original context radically
- Avoid literal translation or direct adaptation of input examples

3. Creativity:
- Invent fresh narrative contexts
- Vocabulary items should feel organic and spontaneous in use

Example:
Input: "Du hörst aufmerksam zu."
FORBIDDEN: Repeating the 2nd person, present tense scenario
REQUIRED: A completely different context (different person, time or object)

Items:
{}
"#,
        format_vocabulary(items)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(front: &str, back: &str) -> VocabularyItem {
        VocabularyItem {
            front_text: front.to_string(),
            back_text: back.to_string(),
        }
    }

    #[test]
    fn test_format_vocabulary() {
        let items = vec![item("der Hund", "pies"), item("die Katze", "kot")];
        assert_eq!(format_vocabulary(&items), "der Hund,pies;die Katze,kot");
    }

    #[test]
    fn test_prompt_ends_with_items() {
        let prompt = build_prompt(&[item("gehen", "iść")]);
        assert!(prompt.trim_end().ends_with("Items:\ngehen,iść"));
    }
}
