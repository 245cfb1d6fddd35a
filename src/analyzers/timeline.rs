use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::{ConversationRecord, TimelinePoint};

/// Conversations per month, ascending.
///
/// A conversation is placed by its creation time, falling back to its first
/// message's timestamp. Conversations with neither are left out.
pub fn build_timeline(conversations: &[ConversationRecord]) -> Vec<TimelinePoint> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();

    for conv in conversations {
        let started = conv
            .created_at
            .or_else(|| conv.messages.first().and_then(|m| m.timestamp));
        if let Some(dt) = started {
            *buckets.entry(dt.format("%Y-%m").to_string()).or_insert(0) += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(month, conversations)| TimelinePoint {
            month,
            conversations,
        })
        .collect()
}

/// Earliest and latest known timestamps across conversations and messages.
pub fn interaction_span(
    conversations: &[ConversationRecord],
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let stamps = conversations.iter().flat_map(|conv| {
        conv.messages
            .iter()
            .filter_map(|m| m.timestamp)
            .chain(conv.created_at)
            .chain(conv.updated_at)
    });

    stamps.fold((None, None), |(first, last), ts| {
        (
            Some(first.map_or(ts, |f: DateTime<Utc>| f.min(ts))),
            Some(last.map_or(ts, |l: DateTime<Utc>| l.max(ts))),
        )
    })
}
