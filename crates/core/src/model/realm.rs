use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RealmError {
    #[error("unknown topic: {0:?}")]
    UnknownTopic(String),

    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}

//
// ─── REALM ─────────────────────────────────────────────────────────────────────
//

/// Topic bucket of the question bank.
///
/// The order of `Realm::ALL` is the feature order used by the weakness detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    Grammar,
    Articles,
    Synonyms,
    Antonyms,
    Sentences,
}

impl Realm {
    pub const ALL: [Realm; 5] = [
        Realm::Grammar,
        Realm::Articles,
        Realm::Synonyms,
        Realm::Antonyms,
        Realm::Sentences,
    ];

    /// Lowercase key as stored in the question bank and logs.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Realm::Grammar => "grammar",
            Realm::Articles => "articles",
            Realm::Synonyms => "synonyms",
            Realm::Antonyms => "antonyms",
            Realm::Sentences => "sentences",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Realm::Grammar => "Grammar Grove",
            Realm::Articles => "Article Academy",
            Realm::Synonyms => "Synonym Sanctuary",
            Realm::Antonyms => "Antonym Archipelago",
            Realm::Sentences => "Sentence Citadel",
        }
    }

    #[must_use]
    pub fn mentor(self) -> &'static str {
        match self {
            Realm::Grammar => "Professor Syntax",
            Realm::Articles => "Librarian Articula",
            Realm::Synonyms => "The Wordweaver",
            Realm::Antonyms => "Captain Contrary",
            Realm::Sentences => "The Grand Architect",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Realm::Grammar => "Verb forms, tenses, plurals and agreement.",
            Realm::Articles => "Choosing between a, an, the and no article.",
            Realm::Synonyms => "Words that share a meaning.",
            Realm::Antonyms => "Words with opposite meanings.",
            Realm::Sentences => "Building complete, correct sentences.",
        }
    }

    /// Chapter title for the given difficulty inside this realm.
    #[must_use]
    pub fn chapter_title(self, difficulty: Difficulty) -> &'static str {
        use Difficulty::{Easy, Hard, Medium};
        match (self, difficulty) {
            (Realm::Grammar, Easy) => "The Whispering Woods",
            (Realm::Grammar, Medium) => "The Enchanted Clearing",
            (Realm::Grammar, Hard) => "The Sacred Grove",
            (Realm::Articles, Easy) => "The Reading Room",
            (Realm::Articles, Medium) => "The Manuscript Hall",
            (Realm::Articles, Hard) => "The Sacred Archive",
            (Realm::Synonyms, Easy) => "The Garden Gates",
            (Realm::Synonyms, Medium) => "The Butterfly Meadow",
            (Realm::Synonyms, Hard) => "The Heart of the Sanctuary",
            (Realm::Antonyms, Easy) => "Mirror Bay",
            (Realm::Antonyms, Medium) => "Reflection Ridge",
            (Realm::Antonyms, Hard) => "The Opposite Observatory",
            (Realm::Sentences, Easy) => "The Outer Courtyard",
            (Realm::Sentences, Medium) => "The Great Hall",
            (Realm::Sentences, Hard) => "The Throne Room",
        }
    }

    /// Position of this realm in `Realm::ALL`.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Realm::Grammar => 0,
            Realm::Articles => 1,
            Realm::Synonyms => 2,
            Realm::Antonyms => 3,
            Realm::Sentences => 4,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Realm {
    type Err = RealmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|realm| realm.key() == key)
            .ok_or_else(|| RealmError::UnknownTopic(s.to_owned()))
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = RealmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.key() == key)
            .ok_or_else(|| RealmError::UnknownDifficulty(s.to_owned()))
    }
}

//
// ─── CHAPTER KEY ───────────────────────────────────────────────────────────────
//

/// A realm × difficulty bucket of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterKey {
    pub realm: Realm,
    pub difficulty: Difficulty,
}

impl ChapterKey {
    #[must_use]
    pub fn new(realm: Realm, difficulty: Difficulty) -> Self {
        Self { realm, difficulty }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        self.realm.chapter_title(self.difficulty)
    }

    /// Every chapter of a realm, easiest first.
    pub fn all_in(realm: Realm) -> impl Iterator<Item = ChapterKey> {
        Difficulty::ALL
            .into_iter()
            .map(move |difficulty| ChapterKey::new(realm, difficulty))
    }
}

impl fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.realm, self.difficulty)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
