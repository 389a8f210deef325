//! In-memory lesson tree

/// A card as it appears in the lesson file, before it gets an identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCard {
    pub front_text: String,
    pub back_text: String,
    /// `LearnedTimestamp` attribute of the front side, verbatim
    pub learned_timestamp: Option<String>,
}

impl RawCard {
    pub fn new(front_text: impl Into<String>, back_text: impl Into<String>) -> Self {
        Self {
            front_text: front_text.into(),
            back_text: back_text.into(),
            learned_timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.learned_timestamp = Some(timestamp.into());
        self
    }
}

/// One pile of cards. Its position in the lesson is its batch number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub cards: Vec<RawCard>,
}

/// A parsed Pauker lesson
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lesson {
    /// Text of the lesson's `Description` element
    pub description: Option<String>,
    pub batches: Vec<Batch>,
}

impl Lesson {
    /// Total number of card elements across all batches
    pub fn card_count(&self) -> usize {
        self.batches.iter().map(|b| b.cards.len()).sum()
    }
}
