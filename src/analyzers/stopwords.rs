use std::collections::HashSet;

/// Built-in English stopwords (used when the config does not replace them).
/// Role names and export jargon are included so they never surface as keywords.
/// Negators are listed too; sentiment scoring reads unfiltered words.
/// "don't" stays a keyword.
const BUILTIN_STOPWORDS: &[&str] = &[
    "a", "about", "able", "across", "all", "also", "an", "analysis", "analyze", "and", "any",
    "api", "are", "as", "assistant", "based", "be", "because", "been", "being", "but", "by",
    "can", "could", "did", "do", "does", "doesn't", "each", "etc", "even", "every", "file",
    "files", "for", "from", "get", "have", "he", "how", "i", "if", "in", "into", "is", "it",
    "it's", "its", "just", "let", "let's", "lets", "like", "made", "make", "many", "may", "me",
    "more", "most", "much", "my", "need", "next", "no", "not", "of", "on", "onto", "or",
    "other", "our", "ours", "out", "over", "per", "project", "projects", "py", "really", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "to", "us", "use", "used", "user", "using", "very",
    "via", "was", "we", "were", "what", "when", "where", "which", "while", "who", "why",
    "will", "with", "would", "you", "your",
];

/// Resolved stopword set. Built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn builtin() -> Self {
        Self::from_words(BUILTIN_STOPWORDS.iter().copied())
    }

    /// Start from `replace` when given, otherwise the built-in list, then add `extra`.
    pub fn resolve(replace: Option<&[String]>, extra: &[String]) -> Self {
        let mut set = match replace {
            Some(words) => Self::from_words(words.iter().map(|s| s.as_str())),
            None => Self::builtin(),
        };
        for word in extra {
            set.insert(word);
        }
        set
    }

    fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self {
            words: HashSet::new(),
        };
        for word in words {
            set.insert(word);
        }
        set
    }

    fn insert(&mut self, word: &str) {
        let normalized = word.trim().to_lowercase().replace('\u{2019}', "'");
        if !normalized.is_empty() {
            self.words.insert(normalized);
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::builtin()
    }
}
