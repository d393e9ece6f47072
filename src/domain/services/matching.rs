//! Helper suggestions for a client, ranked by shared need-tags.
//!
//! Scores are for display only; nothing is connected automatically.

use crate::domain::models::connection::Connection;
use crate::domain::models::user::User;
use std::collections::HashSet;

/// Anything that can be suggested to a client.
pub trait Candidate {
    fn display_name(&self) -> &str;
    fn need_tags(&self) -> &[String];
    /// Whether the org still offers this helper for new matches.
    fn is_active_in(&self, org_id: &str) -> bool;
}

impl Candidate for User {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn need_tags(&self) -> &[String] {
        &self.needs
    }

    fn is_active_in(&self, org_id: &str) -> bool {
        User::is_active_in(self, org_id)
    }
}

#[derive(Debug)]
pub struct Suggestion<'a, H> {
    pub helper: &'a H,
    pub score: usize,
    /// Most recent connection between the client and this helper, if any.
    pub connection: Option<&'a Connection>,
}

/// Trimmed, lowercased, non-empty tags.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> HashSet<String> {
    tags.iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Number of distinct tags the helper shares with the client.
pub fn score(client_tags: &HashSet<String>, helper_tags: &[String]) -> usize {
    normalize_tags(helper_tags).intersection(client_tags).count()
}

/// Helpers active in `org_id` sharing at least one tag, best match first. Ties
/// keep input order.
pub fn suggest<'a, H: Candidate>(
    client_needs: &[String],
    org_id: &str,
    helpers: &'a [H],
) -> Vec<Suggestion<'a, H>> {
    let client_tags = normalize_tags(client_needs);
    if client_tags.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Suggestion<'a, H>> = helpers
        .iter()
        .filter(|h| h.is_active_in(org_id))
        .map(|helper| Suggestion {
            helper,
            score: score(&client_tags, helper.need_tags()),
            connection: None,
        })
        .filter(|s| s.score > 0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// The list shown on a client card: helpers already connected to the client
/// (any status, newest connection first), then fresh suggestions. One entry per
/// helper display name.
pub fn display_list<'a, H: Candidate>(
    client_needs: &[String],
    org_id: &str,
    helpers: &'a [H],
    connected: &[(&'a H, &'a Connection)],
) -> Vec<Suggestion<'a, H>> {
    let client_tags = normalize_tags(client_needs);

    let mut linked: Vec<&(&'a H, &'a Connection)> = connected.iter().collect();
    linked.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries = Vec::new();

    for (helper, connection) in linked {
        if seen.insert(name_key(helper.display_name())) {
            entries.push(Suggestion {
                helper: *helper,
                score: score(&client_tags, helper.need_tags()),
                connection: Some(*connection),
            });
        }
    }

    for suggestion in suggest(client_needs, org_id, helpers) {
        if seen.insert(name_key(suggestion.helper.display_name())) {
            entries.push(suggestion);
        }
    }

    entries
}

fn name_key(name: &str) -> String {
    name.trim().to_string()
}
