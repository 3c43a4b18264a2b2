// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A voting contest with its own eligible-candidate list and rank depth.
///
/// Categories are fixed at configuration time and never mutated at runtime.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Category {
    pub name: String,
    /// The eligible candidates, in display order.
    pub candidates: Vec<String>,
    /// How many ranked picks a voter may submit for this category.
    pub max_picks: u32,
}

/// The mapping from rank position (1-indexed) to a point value.
///
/// Weights are non-increasing and non-negative. Any rank beyond the defined
/// range is worth 0 points.
#[derive(PartialEq, Debug, Clone)]
pub struct PointsSchedule {
    weights: Vec<f64>,
}

impl PointsSchedule {
    /// Builds a schedule from (rank, points) pairs.
    ///
    /// The ranks must cover 1..=n without gaps. The order of the pairs does
    /// not matter.
    pub fn from_pairs(pairs: &[(u32, f64)]) -> Result<PointsSchedule, BallotErrors> {
        if pairs.is_empty() {
            return Err(BallotErrors::InvalidSchedule(
                "the points schedule is empty".to_string(),
            ));
        }
        let mut sorted: Vec<(u32, f64)> = pairs.to_vec();
        sorted.sort_by_key(|(rank, _)| *rank);
        for (idx, (rank, _)) in sorted.iter().enumerate() {
            if *rank != (idx + 1) as u32 {
                return Err(BallotErrors::InvalidSchedule(format!(
                    "the schedule ranks must cover 1..={} without gaps, found rank {}",
                    sorted.len(),
                    rank
                )));
            }
        }
        let weights: Vec<f64> = sorted.iter().map(|(_, points)| *points).collect();
        for w in weights.windows(2) {
            if w[1] > w[0] {
                return Err(BallotErrors::InvalidSchedule(format!(
                    "the schedule weights must be non-increasing, found {} before {}",
                    w[0], w[1]
                )));
            }
        }
        if let Some(last) = weights.last() {
            if *last < 0.0 {
                return Err(BallotErrors::InvalidSchedule(format!(
                    "the schedule weights must be non-negative, found {}",
                    last
                )));
            }
        }
        Ok(PointsSchedule { weights })
    }

    /// The points granted to the given 1-indexed rank position.
    pub fn points_for(&self, rank: u32) -> f64 {
        if rank == 0 {
            return 0.0;
        }
        self.weights.get((rank - 1) as usize).copied().unwrap_or(0.0)
    }

    /// The number of ranks with a defined weight.
    pub fn depth(&self) -> u32 {
        self.weights.len() as u32
    }
}

/// The identity fields attached to a submission.
///
/// The name is always required. Whether phone and media are required is
/// decided by the contest rules.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoterIdentity {
    pub name: String,
    pub phone: Option<String>,
    pub media: Option<String>,
}

/// One voter's full submission across all categories.
///
/// The selections are ordered: category order and within-category order are
/// both preserved all the way to the appended rows.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub identity: VoterIdentity,
    pub selections: Vec<(String, Vec<String>)>,
}

/// The read-only configuration consumed by the aggregator.
#[derive(PartialEq, Debug, Clone)]
pub struct ContestRules {
    pub categories: Vec<Category>,
    pub schedule: PointsSchedule,
    pub require_phone: bool,
    pub require_media: bool,
}

impl ContestRules {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}

// ******** Output data structures *********

/// One persisted (voter, category, candidate, rank, points) record.
///
/// Rows are immutable once appended. `points` is `None` when the backing
/// store holds a missing or non-numeric value for this cell.
#[derive(PartialEq, Debug, Clone)]
pub struct VoteRow {
    pub voter: String,
    pub phone: Option<String>,
    pub media: Option<String>,
    pub category: String,
    pub candidate: String,
    pub rank: u32,
    pub points: Option<f64>,
}

/// One line of a per-category leaderboard.
#[derive(PartialEq, Debug, Clone)]
pub struct LeaderboardEntry {
    /// 1-indexed position in the sorted standings.
    pub position: u32,
    pub candidate: String,
    pub total_points: f64,
}

/// The confirmation returned for an accepted ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Receipt {
    pub voter: String,
    pub rows_appended: u32,
}

// ********* Errors **********

/// A failure of the backing store (read or append).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StorageFault {
    pub message: String,
}

impl Error for StorageFault {}

impl Display for StorageFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ledger storage fault: {}", self.message)
    }
}

/// Reasons for which a submission is rejected or a tally cannot run.
#[derive(PartialEq, Debug, Clone)]
pub enum BallotErrors {
    /// The voter name is missing or blank after trimming.
    MissingVoterName,
    /// The contest collects phone numbers and none was provided.
    MissingPhone,
    /// The contest collects a media label and none was provided.
    MissingMedia,
    /// The named category is not part of the contest.
    UnknownCategory(String),
    /// The candidate is not in the category's eligible set.
    UnknownCandidate { category: String, candidate: String },
    /// The same candidate appears twice in one category's list.
    DuplicateCandidate { category: String, candidate: String },
    /// More picks than the category's rank depth allows.
    TooManyPicks { category: String, max_picks: u32 },
    /// The voter identity already appears in the ledger.
    DuplicateVoter(String),
    /// The points schedule is malformed.
    InvalidSchedule(String),
    /// The backing store failed.
    Storage(StorageFault),
}

impl Error for BallotErrors {}

impl Display for BallotErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotErrors::MissingVoterName => {
                write!(f, "a non-blank voter name is required")
            }
            BallotErrors::MissingPhone => {
                write!(f, "a non-blank phone number is required for this contest")
            }
            BallotErrors::MissingMedia => {
                write!(f, "a non-blank media label is required for this contest")
            }
            BallotErrors::UnknownCategory(name) => {
                write!(f, "unknown category: {}", name)
            }
            BallotErrors::UnknownCandidate {
                category,
                candidate,
            } => {
                write!(
                    f,
                    "candidate {} is not eligible in category {}",
                    candidate, category
                )
            }
            BallotErrors::DuplicateCandidate {
                category,
                candidate,
            } => {
                write!(
                    f,
                    "candidate {} is listed twice in category {}",
                    candidate, category
                )
            }
            BallotErrors::TooManyPicks {
                category,
                max_picks,
            } => {
                write!(
                    f,
                    "category {} accepts at most {} ranked picks",
                    category, max_picks
                )
            }
            BallotErrors::DuplicateVoter(name) => {
                write!(f, "{} has already voted", name)
            }
            BallotErrors::InvalidSchedule(msg) => {
                write!(f, "invalid points schedule: {}", msg)
            }
            BallotErrors::Storage(fault) => fault.fmt(f),
        }
    }
}

impl From<StorageFault> for BallotErrors {
    fn from(fault: StorageFault) -> Self {
        BallotErrors::Storage(fault)
    }
}
