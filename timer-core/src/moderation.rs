use std::collections::HashSet;

/// Pure predicate over user-supplied text (names and taunt messages).
pub trait ContentFilter: Send + Sync {
    fn is_allowed(&self, text: &str) -> bool;
}

const DEFAULT_BLOCKED_WORDS: &[&str] = &[
    "asshole",
    "bastard",
    "bitch",
    "cunt",
    "dickhead",
    "fuck",
    "fucker",
    "fucking",
    "motherfucker",
    "shit",
    "slut",
    "whore",
];

/// Case-insensitive whole-word block list.
#[derive(Clone, Debug)]
pub struct BlockList {
    words: HashSet<String>,
}

impl BlockList {
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Add words to the list. Blank entries are ignored.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for BlockList {
    fn default() -> Self {
        Self::empty().with_words(DEFAULT_BLOCKED_WORDS)
    }
}

impl ContentFilter for BlockList {
    fn is_allowed(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .all(|token| !self.words.contains(&token.to_lowercase()))
    }
}
