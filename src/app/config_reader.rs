use crate::app::*;

use ballot_ledger::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub candidates: Vec<String>,
    #[serde(rename = "maxPicks")]
    pub max_picks: Option<u32>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "ledgerPath")]
    pub ledger_path: Option<String>,
    #[serde(rename = "requirePhone")]
    pub require_phone: Option<bool>,
    #[serde(rename = "requireMedia")]
    pub require_media: Option<bool>,
    #[serde(rename = "pointsSchedule")]
    pub points_schedule: HashMap<String, f64>,
    pub categories: Vec<CategoryConfig>,
}

/// One ballot as written by the input-collection side.
///
/// The selections object maps a category name to the ranked picks. The key
/// order in the file is not significant, see `io_common::assemble_ballot`.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotFile {
    pub name: String,
    pub phone: Option<String>,
    pub media: Option<String>,
    pub selections: HashMap<String, Vec<String>>,
}

pub fn read_contest_config(path: &str) -> AppResult<ContestConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    let config: ContestConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Turns the raw configuration into the rules consumed by the aggregator.
pub fn validate_contest(config: &ContestConfig) -> AppResult<ContestRules> {
    let mut pairs: Vec<(u32, f64)> = Vec::new();
    for (rank_str, points) in config.points_schedule.iter() {
        match rank_str.parse::<u32>() {
            Ok(rank) if rank >= 1 => pairs.push((rank, *points)),
            _ => {
                whatever!(
                    "Failed to understand rank {:?} in the points schedule",
                    rank_str
                )
            }
        }
    }
    let schedule = PointsSchedule::from_pairs(&pairs).context(RejectedSnafu {})?;

    if config.categories.is_empty() {
        whatever!("the contest has no categories");
    }
    let mut seen: HashSet<&str> = HashSet::new();
    let mut categories: Vec<Category> = Vec::new();
    for c in config.categories.iter() {
        if !seen.insert(c.name.as_str()) {
            whatever!("category {:?} is configured twice", c.name);
        }
        if c.candidates.is_empty() {
            whatever!("category {:?} has no eligible candidates", c.name);
        }
        let max_picks = match c.max_picks {
            Some(x) if x >= 1 => x,
            Some(x) => {
                whatever!("category {:?}: maxPicks must be at least 1, found {}", c.name, x)
            }
            // Default to the depth of the points schedule.
            None => schedule.depth(),
        };
        categories.push(Category {
            name: c.name.clone(),
            candidates: c.candidates.clone(),
            max_picks,
        });
    }

    Ok(ContestRules {
        categories,
        schedule,
        require_phone: config.require_phone.unwrap_or(false),
        require_media: config.require_media.unwrap_or(false),
    })
}

pub fn read_summary(path: &str) -> AppResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
