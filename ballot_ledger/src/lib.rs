mod config;
pub mod builder;
pub mod manual;
pub mod quick_start;

use log::{debug, info};

use std::cmp::Ordering;

pub use crate::config::*;

/// The narrow contract of the backing store.
///
/// The ledger is the union of all rows ever appended. There is no batching
/// guarantee: the aggregator calls `append_row` once per row and the calls
/// are independent of each other.
pub trait LedgerStore {
    fn read_all_rows(&self) -> Result<Vec<VoteRow>, StorageFault>;
    fn append_row(&mut self, row: &VoteRow) -> Result<(), StorageFault>;
}

/// The simplest backing store, a vector of rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    rows: Vec<VoteRow>,
}

impl MemoryLedger {
    pub fn new() -> MemoryLedger {
        MemoryLedger { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl LedgerStore for MemoryLedger {
    fn read_all_rows(&self) -> Result<Vec<VoteRow>, StorageFault> {
        Ok(self.rows.clone())
    }

    fn append_row(&mut self, row: &VoteRow) -> Result<(), StorageFault> {
        self.rows.push(row.clone());
        Ok(())
    }
}

fn trimmed_non_blank(value: &Option<String>) -> Option<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

// Identity validation happens before any storage access.
fn validate_identity(
    rules: &ContestRules,
    identity: &VoterIdentity,
) -> Result<VoterIdentity, BallotErrors> {
    let name = identity.name.trim().to_string();
    if name.is_empty() {
        return Err(BallotErrors::MissingVoterName);
    }
    let phone = trimmed_non_blank(&identity.phone);
    if rules.require_phone && phone.is_none() {
        return Err(BallotErrors::MissingPhone);
    }
    let media = trimmed_non_blank(&identity.media);
    if rules.require_media && media.is_none() {
        return Err(BallotErrors::MissingMedia);
    }
    Ok(VoterIdentity { name, phone, media })
}

// The input-collection boundary is expected to enforce the shape of the
// selections. Check everything again here so that a malformed ballot is
// rejected before the first row is appended.
fn validate_selections(rules: &ContestRules, ballot: &Ballot) -> Result<(), BallotErrors> {
    for (category_name, picks) in ballot.selections.iter() {
        let category = rules
            .category(category_name)
            .ok_or_else(|| BallotErrors::UnknownCategory(category_name.clone()))?;
        if picks.len() as u32 > category.max_picks {
            return Err(BallotErrors::TooManyPicks {
                category: category.name.clone(),
                max_picks: category.max_picks,
            });
        }
        for (idx, candidate) in picks.iter().enumerate() {
            if !category.candidates.iter().any(|c| c == candidate) {
                return Err(BallotErrors::UnknownCandidate {
                    category: category.name.clone(),
                    candidate: candidate.clone(),
                });
            }
            if picks[..idx].iter().any(|c| c == candidate) {
                return Err(BallotErrors::DuplicateCandidate {
                    category: category.name.clone(),
                    candidate: candidate.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Records one ballot in the ledger.
///
/// The sequence is read-check-append: the identity and the selections are
/// validated first, then the full current row set is read to detect a repeat
/// voter, then one row is appended per ranked pick. A voter whose name (or
/// supplied phone number) matches an existing row exactly is rejected and
/// nothing is written.
///
/// Two concurrent submissions from the same voter may both pass the
/// uniqueness check; the ledger has no lock around the sequence. A storage
/// fault in the middle of the appends leaves the rows written so far in
/// place.
pub fn submit_ballot<S: LedgerStore>(
    store: &mut S,
    rules: &ContestRules,
    ballot: &Ballot,
) -> Result<Receipt, BallotErrors> {
    let identity = validate_identity(rules, &ballot.identity)?;
    validate_selections(rules, ballot)?;

    let rows = store.read_all_rows()?;
    debug!(
        "submit_ballot: voter {:?}, {} existing rows",
        identity.name,
        rows.len()
    );
    for row in rows.iter() {
        if row.voter == identity.name {
            return Err(BallotErrors::DuplicateVoter(identity.name));
        }
        if let (Some(phone), Some(row_phone)) = (&identity.phone, &row.phone) {
            if phone == row_phone {
                return Err(BallotErrors::DuplicateVoter(identity.name));
            }
        }
    }

    let mut rows_appended: u32 = 0;
    for (category_name, picks) in ballot.selections.iter() {
        for (idx, candidate) in picks.iter().enumerate() {
            let rank = (idx + 1) as u32;
            let row = VoteRow {
                voter: identity.name.clone(),
                phone: identity.phone.clone(),
                media: identity.media.clone(),
                category: category_name.clone(),
                candidate: candidate.clone(),
                rank,
                points: Some(rules.schedule.points_for(rank)),
            };
            store.append_row(&row)?;
            rows_appended += 1;
        }
    }
    info!(
        "submit_ballot: recorded {} rows for voter {:?}",
        rows_appended, identity.name
    );
    Ok(Receipt {
        voter: identity.name,
        rows_appended,
    })
}

/// Computes the standings of one category from a row set.
///
/// Rows are grouped by candidate in first-seen order and their points summed.
/// An absent points value contributes nothing to the sum but still counts the
/// candidate in. The sort is stable and descending, so candidates with equal
/// totals keep their first-seen order.
pub fn leaderboard_for(rows: &[VoteRow], category: &str) -> Vec<LeaderboardEntry> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for row in rows.iter().filter(|r| r.category == category) {
        let idx = match totals.iter().position(|(name, _)| *name == row.candidate) {
            Some(idx) => idx,
            None => {
                totals.push((row.candidate.clone(), 0.0));
                totals.len() - 1
            }
        };
        if let Some(points) = row.points {
            totals[idx].1 += points;
        }
    }
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    totals
        .into_iter()
        .enumerate()
        .map(|(idx, (candidate, total_points))| LeaderboardEntry {
            position: (idx + 1) as u32,
            candidate,
            total_points,
        })
        .collect()
}

/// Reads the full current row set and tallies one category.
///
/// Nothing is cached: every call recomputes from scratch, so the standings
/// move as the ledger grows. An empty ledger yields an empty vector.
pub fn compute_leaderboard<S: LedgerStore>(
    store: &S,
    rules: &ContestRules,
    category: &str,
) -> Result<Vec<LeaderboardEntry>, BallotErrors> {
    if rules.category(category).is_none() {
        return Err(BallotErrors::UnknownCategory(category.to_string()));
    }
    let rows = store.read_all_rows()?;
    debug!(
        "compute_leaderboard: category {:?}, {} rows in ledger",
        category,
        rows.len()
    );
    Ok(leaderboard_for(&rows, category))
}
