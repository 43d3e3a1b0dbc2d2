//! Debounced search highlighting
//!
//! The highlighter owns the search text buffer and a single pending timer.
//! Every edit re-arms the timer with the value it saw; only the most recently
//! armed timer can fire, so a burst of keystrokes renders exactly once, with
//! the last value. Clearing the field takes effect immediately, without a
//! timer.
//!
//! The timer is an owned deadline polled with an explicit `Instant`, so the
//! GUI drives it from its frame loop and tests drive it with fabricated
//! clocks.

use std::time::{Duration, Instant};

/// Debounce delay between the last keystroke and the highlight pass
pub const HIGHLIGHT_DELAY: Duration = Duration::from_millis(300);

/// Per-row visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    /// Rest state: no query active, no styling overrides
    #[default]
    Neutral,
    /// Row text contains the query: emphasized, full opacity
    Matched,
    /// Row text does not contain the query: dimmed
    Unmatched,
}

/// What an edit did to the highlighter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEdge {
    /// Field became empty: highlights must be cleared now
    Cleared,
    /// A highlight pass was scheduled
    Armed,
}

/// An armed timer bound to the query value it saw
#[derive(Debug, Clone)]
struct PendingHighlight {
    query: String,
    deadline: Instant,
}

/// Search state: the text buffer, the active affordance flag, and at most one
/// pending highlight timer
pub struct SearchHighlighter {
    /// Current search query, edited by the search field
    pub query: String,
    pending: Option<PendingHighlight>,
    active: bool,
    delay: Duration,
}

impl Default for SearchHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchHighlighter {
    pub fn new() -> Self {
        Self::with_delay(HIGHLIGHT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            query: String::new(),
            pending: None,
            active: false,
            delay,
        }
    }

    /// Whether the input should show its "active" affordance. Set the moment
    /// a non-empty query is typed, not when the highlight fires.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Called on every edit of the query buffer. Arming replaces any earlier
    /// unfired timer, which is the whole debounce contract.
    pub fn on_query_changed(&mut self, now: Instant) -> QueryEdge {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            self.pending = None;
            self.active = false;
            QueryEdge::Cleared
        } else {
            self.active = true;
            self.pending = Some(PendingHighlight {
                query: trimmed.to_string(),
                deadline: now + self.delay,
            });
            QueryEdge::Armed
        }
    }

    /// Consume the pending timer if its deadline has passed, yielding the
    /// query it was armed with.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            self.pending.take().map(|p| p.query)
        } else {
            None
        }
    }

    /// Deadline of the pending timer, for repaint scheduling
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    #[cfg(test)]
    fn pending_query(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.query.as_str())
    }
}

/// Classify every row in one pass: case-insensitive substring containment of
/// the trimmed query in the row's full visible text. An empty query yields
/// all-Neutral.
pub fn scan_rows<I, S>(query: &str, rows: I) -> Vec<RowState>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needle = query.trim().to_lowercase();
    rows.into_iter()
        .map(|row| {
            if needle.is_empty() {
                RowState::Neutral
            } else if row.as_ref().to_lowercase().contains(&needle) {
                RowState::Matched
            } else {
                RowState::Unmatched
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> Instant {
        Instant::now()
    }

    #[test]
    fn burst_of_edits_fires_once_with_last_value() {
        let mut hl = SearchHighlighter::new();
        let t0 = clock();

        for (i, q) in ["c", "co", "cof"].iter().enumerate() {
            hl.query = q.to_string();
            let armed_at = t0 + Duration::from_millis(i as u64 * 100);
            assert_eq!(hl.on_query_changed(armed_at), QueryEdge::Armed);
            // Earlier timers are superseded, never fired
            assert_eq!(hl.poll(armed_at), None);
        }
        assert_eq!(hl.pending_query(), Some("cof"));

        // 299 ms after the last edit: still pending
        let last_edit = t0 + Duration::from_millis(200);
        assert_eq!(hl.poll(last_edit + Duration::from_millis(299)), None);

        // 300 ms after the last edit: exactly one fire, last value
        assert_eq!(
            hl.poll(last_edit + Duration::from_millis(300)),
            Some("cof".to_string())
        );
        assert_eq!(hl.poll(last_edit + Duration::from_millis(400)), None);
    }

    #[test]
    fn clearing_cancels_pending_and_deactivates() {
        let mut hl = SearchHighlighter::new();
        let t0 = clock();

        hl.query = "tea".to_string();
        hl.on_query_changed(t0);
        assert!(hl.is_active());

        hl.query = "   ".to_string();
        assert_eq!(hl.on_query_changed(t0 + Duration::from_millis(50)), QueryEdge::Cleared);
        assert!(!hl.is_active());
        assert_eq!(hl.next_deadline(), None);
        // Nothing fires later
        assert_eq!(hl.poll(t0 + Duration::from_secs(2)), None);
    }

    #[test]
    fn query_is_trimmed_before_arming() {
        let mut hl = SearchHighlighter::new();
        let t0 = clock();
        hl.query = "  cof  ".to_string();
        hl.on_query_changed(t0);
        assert_eq!(hl.pending_query(), Some("cof"));
    }

    #[test]
    fn matched_and_unmatched_partition_rows() {
        let rows = ["Coffee - $4.50", "Tea - $3.00"];
        let states = scan_rows("cof", rows);
        assert_eq!(states, vec![RowState::Matched, RowState::Unmatched]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let states = scan_rows("COFFEE", ["arabica coffee beans"]);
        assert_eq!(states, vec![RowState::Matched]);
    }

    #[test]
    fn zero_match_query_dims_every_row() {
        let states = scan_rows("zzz", ["Coffee", "Tea"]);
        assert_eq!(states, vec![RowState::Unmatched, RowState::Unmatched]);
        // Dimmed, not removed: the vector still covers every row
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn empty_query_yields_all_neutral() {
        let states = scan_rows("   ", ["Coffee", "Tea"]);
        assert_eq!(states, vec![RowState::Neutral, RowState::Neutral]);
    }
}
