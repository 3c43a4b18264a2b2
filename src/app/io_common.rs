use ballot_ledger::{Ballot, ContestRules, VoterIdentity};

use crate::app::config_reader::BallotFile;

/// Orders a ballot file's selections the way the aggregator expects them.
///
/// JSON objects carry no reliable key order, so the categories are laid out
/// in configuration order. Categories absent from the configuration are kept
/// at the end (sorted by name) so that submission rejects them instead of
/// silently dropping them.
pub fn assemble_ballot(rules: &ContestRules, ballot_file: &BallotFile) -> Ballot {
    let mut selections: Vec<(String, Vec<String>)> = Vec::new();
    for category in rules.categories.iter() {
        if let Some(picks) = ballot_file.selections.get(&category.name) {
            selections.push((category.name.clone(), picks.clone()));
        }
    }
    let mut unknown: Vec<&String> = ballot_file
        .selections
        .keys()
        .filter(|name| rules.category(name).is_none())
        .collect();
    unknown.sort();
    for name in unknown {
        selections.push((name.clone(), ballot_file.selections[name].clone()));
    }
    Ballot {
        identity: VoterIdentity {
            name: ballot_file.name.clone(),
            phone: ballot_file.phone.clone(),
            media: ballot_file.media.clone(),
        },
        selections,
    }
}
