use std::collections::HashMap;

/// Term counts that remember first-seen order.
///
/// Ranking sorts stably by count over insertion order, so equal counts keep
/// the order in which terms first appeared in the corpus. Map iteration
/// order never leaks into results.
#[derive(Debug, Clone, Default)]
pub struct TermCounts {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl TermCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: &str) {
        self.add_n(term, 1);
    }

    pub fn add_n(&mut self, term: &str, n: usize) {
        if n == 0 {
            return;
        }
        match self.index.get(term) {
            Some(&i) => self.entries[i].1 += n,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push((term.to_string(), n));
            }
        }
    }

    pub fn get(&self, term: &str) -> usize {
        self.index.get(term).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold `other` in after the terms already seen. New terms keep
    /// `other`'s first-seen order, so merging per-conversation counts in
    /// corpus order reproduces corpus-wide first-seen order.
    pub fn merge(&mut self, other: &TermCounts) {
        for (term, count) in other.iter() {
            self.add_n(term, count);
        }
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// At most `n` terms, count descending, ties by first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<S> for TermCounts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counts = TermCounts::new();
        for term in iter {
            counts.add(term.as_ref());
        }
        counts
    }
}

/// Count adjacent token pairs, one message at a time. A word next to
/// itself ("data data") is not a phrase and is skipped.
pub fn count_bigrams<S: AsRef<str>>(messages: &[Vec<S>]) -> TermCounts {
    let mut counts = TermCounts::new();
    for tokens in messages {
        for pair in tokens.windows(2) {
            let (first, second) = (pair[0].as_ref(), pair[1].as_ref());
            if first == second {
                continue;
            }
            counts.add(&format!("{} {}", first, second));
        }
    }
    counts
}

pub fn top_terms<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<(String, usize)> {
    tokens.iter().collect::<TermCounts>().top(n)
}

/// Bigrams never cross message boundaries.
pub fn top_bigrams<S: AsRef<str>>(messages: &[Vec<S>], n: usize) -> Vec<(String, usize)> {
    count_bigrams(messages).top(n)
}
