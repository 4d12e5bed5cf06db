//! Level word table
//!
//! Each level shows three candidate words; exactly one of them is the spoken
//! target. The table cycles once the player passes the last entry. A page can
//! override the built-in table with a JSON array of
//! `{ "target": "...", "options": ["...", "...", "..."] }` objects.

use serde::{Deserialize, Serialize};

/// Number of word blocks per level
pub const OPTIONS_PER_LEVEL: usize = 3;

/// Target word plus the candidate words shown on the blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub target: String,
    pub options: [String; OPTIONS_PER_LEVEL],
}

impl LevelDescriptor {
    pub fn new(target: &str, options: [&str; OPTIONS_PER_LEVEL]) -> Self {
        Self {
            target: target.to_string(),
            options: options.map(str::to_string),
        }
    }

    /// Slot (0..3) of the block carrying the target word
    pub fn correct_slot(&self) -> Option<usize> {
        self.options.iter().position(|w| *w == self.target)
    }

    fn normalize(&mut self) {
        self.target = self.target.trim().to_uppercase();
        for option in &mut self.options {
            *option = option.trim().to_uppercase();
        }
    }
}

/// Why a word list was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    /// The list has no levels
    Empty,
    /// A level's target appears zero or several times among its options
    TargetCount { level: usize, found: usize },
    /// The JSON could not be decoded
    Parse(String),
}

impl std::fmt::Display for WordListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordListError::Empty => write!(f, "word list is empty"),
            WordListError::TargetCount { level, found } => write!(
                f,
                "level {} target appears {} times among its options (expected 1)",
                level + 1,
                found
            ),
            WordListError::Parse(msg) => write!(f, "invalid word list JSON: {}", msg),
        }
    }
}

impl std::error::Error for WordListError {}

/// Ordered list of level descriptors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordList {
    levels: Vec<LevelDescriptor>,
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordList {
    /// The ten built-in rhyming levels
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelDescriptor::new("CAT", ["BAT", "CAT", "RAT"]),
                LevelDescriptor::new("DOG", ["DOG", "LOG", "FOG"]),
                LevelDescriptor::new("SUN", ["RUN", "SUN", "FUN"]),
                LevelDescriptor::new("RED", ["BED", "RED", "FED"]),
                LevelDescriptor::new("ONE", ["WON", "TON", "ONE"]),
                LevelDescriptor::new("BIG", ["PIG", "BIG", "DIG"]),
                LevelDescriptor::new("HOP", ["MOP", "TOP", "HOP"]),
                LevelDescriptor::new("SKY", ["SKY", "FLY", "DRY"]),
                LevelDescriptor::new("FOX", ["BOX", "FOX", "POX"]),
                LevelDescriptor::new("JAM", ["HAM", "JAM", "DAM"]),
            ],
        }
    }

    /// Build a validated list (words are trimmed and upper-cased)
    pub fn new(mut levels: Vec<LevelDescriptor>) -> Result<Self, WordListError> {
        levels.iter_mut().for_each(LevelDescriptor::normalize);
        let list = Self { levels };
        list.validate()?;
        Ok(list)
    }

    /// Decode and validate a JSON word list
    pub fn from_json(json: &str) -> Result<Self, WordListError> {
        let levels: Vec<LevelDescriptor> =
            serde_json::from_str(json).map_err(|e| WordListError::Parse(e.to_string()))?;
        Self::new(levels)
    }

    /// Check the one-target-per-level invariant
    pub fn validate(&self) -> Result<(), WordListError> {
        if self.levels.is_empty() {
            return Err(WordListError::Empty);
        }
        for (level, desc) in self.levels.iter().enumerate() {
            let found = desc.options.iter().filter(|w| **w == desc.target).count();
            if found != 1 {
                return Err(WordListError::TargetCount { level, found });
            }
        }
        Ok(())
    }

    /// Descriptor for a level index, cycling through the table
    pub fn descriptor(&self, index: u32) -> &LevelDescriptor {
        &self.levels[index as usize % self.levels.len()]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let words = WordList::builtin();
        assert_eq!(words.len(), 10);
        assert!(words.validate().is_ok());
    }

    #[test]
    fn test_descriptor_cycles() {
        let words = WordList::builtin();
        assert_eq!(words.descriptor(0).target, "CAT");
        assert_eq!(words.descriptor(10).target, "CAT");
        assert_eq!(words.descriptor(19).target, "JAM");
    }

    #[test]
    fn test_cat_slot_is_middle() {
        let words = WordList::builtin();
        assert_eq!(words.descriptor(0).correct_slot(), Some(1));
    }

    #[test]
    fn test_from_json_normalizes_case() {
        let json = r#"[{ "target": " hen ", "options": ["pen", "HEN", "ten"] }]"#;
        let words = WordList::from_json(json).unwrap();
        assert_eq!(words.descriptor(0).target, "HEN");
        assert_eq!(words.descriptor(0).options[0], "PEN");
    }

    #[test]
    fn test_rejects_missing_target() {
        let json = r#"[{ "target": "HEN", "options": ["PEN", "TEN", "DEN"] }]"#;
        assert_eq!(
            WordList::from_json(json),
            Err(WordListError::TargetCount { level: 0, found: 0 })
        );
    }

    #[test]
    fn test_rejects_duplicate_target() {
        let levels = vec![LevelDescriptor::new("HEN", ["HEN", "hen", "TEN"])];
        assert_eq!(
            WordList::new(levels),
            Err(WordListError::TargetCount { level: 0, found: 2 })
        );
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert_eq!(WordList::from_json("[]"), Err(WordListError::Empty));
        // Two options instead of three
        let json = r#"[{ "target": "HEN", "options": ["HEN", "TEN"] }]"#;
        assert!(matches!(WordList::from_json(json), Err(WordListError::Parse(_))));
    }
}
