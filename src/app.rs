use log::{info, warn};

use ballot_ledger::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::app::config_reader::*;
use crate::app::io_csv::CsvLedger;
use crate::args::Args;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum AppError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No readable worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening ledger {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading ledger line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Ledger line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Ledger line {lineno} has an unreadable rank"))]
    LedgerRank { lineno: usize },
    #[snafu(display("Error appending to ledger {path}"))]
    CsvAppend { source: csv::Error, path: String },
    #[snafu(display("Error opening ledger {path}"))]
    OpeningLedger {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Rejected { source: BallotErrors },
    #[snafu(display("{source}"))]
    Storage { source: StorageFault },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AppResult<T> = Result<T, AppError>;

pub fn run(args: &Args) -> AppResult<()> {
    let config_path = match args.config.clone() {
        Some(p) => p,
        None => whatever!("a contest configuration is required, pass it with --config"),
    };
    let config = read_contest_config(&config_path)?;
    info!("config: {:?}", config);
    let rules = validate_contest(&config)?;
    let ledger_path = resolve_ledger_path(&config_path, &config, &args.ledger);
    info!("ledger: {:?}", ledger_path);
    let mut store = CsvLedger::new(ledger_path);

    if let Some(ballot_path) = args.ballot.clone() {
        run_submit(&rules, &mut store, &ballot_path)
    } else if let Some(xlsx_path) = args.import.clone() {
        run_import(&mut store, &xlsx_path, &args.excel_worksheet_name)
    } else {
        run_tally(&config, &rules, &store, &args.out, &args.reference)
    }
}

// An explicit --ledger always wins. A relative configured path is resolved
// against the directory of the configuration file.
fn resolve_ledger_path(
    config_path: &str,
    config: &ContestConfig,
    ledger_override: &Option<String>,
) -> PathBuf {
    if let Some(p) = ledger_override {
        return PathBuf::from(p);
    }
    let configured = config
        .ledger_path
        .clone()
        .unwrap_or_else(|| "votes.csv".to_string());
    let root = PathBuf::from(config_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    [root, PathBuf::from(configured)].iter().collect()
}

fn run_submit(rules: &ContestRules, store: &mut CsvLedger, ballot_path: &str) -> AppResult<()> {
    info!("Attempting to read ballot file {:?}", ballot_path);
    let ballot_str = fs::read_to_string(ballot_path).context(OpeningJsonSnafu {
        path: ballot_path.to_string(),
    })?;
    let ballot_file: BallotFile =
        serde_json::from_str(&ballot_str).context(ParsingJsonSnafu {})?;
    let ballot = io_common::assemble_ballot(rules, &ballot_file);
    let receipt = submit_ballot(store, rules, &ballot).context(RejectedSnafu {})?;
    println!(
        "Vote recorded for {}: {} rows appended to the ledger.",
        receipt.voter, receipt.rows_appended
    );
    Ok(())
}

fn run_import(
    store: &mut CsvLedger,
    xlsx_path: &str,
    worksheet: &Option<String>,
) -> AppResult<()> {
    let rows = io_xlsx::read_ledger_xlsx(xlsx_path, worksheet)?;
    info!("Importing {} rows from {:?}", rows.len(), xlsx_path);
    for row in rows.iter() {
        store.append_row(row).context(StorageSnafu {})?;
    }
    println!("Imported {} rows into the ledger.", rows.len());
    Ok(())
}

fn run_tally(
    config: &ContestConfig,
    rules: &ContestRules,
    store: &CsvLedger,
    out: &Option<String>,
    reference: &Option<String>,
) -> AppResult<()> {
    let mut results: Vec<JSValue> = Vec::new();
    for category in rules.categories.iter() {
        let standings =
            compute_leaderboard(store, rules, &category.name).context(RejectedSnafu {})?;
        results.push(json!({
            "category": category.name,
            "standings": standings_to_json(&standings),
        }));
    }
    let summary = build_summary_js(&config.contest_name, results);
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;

    match out.as_deref() {
        None | Some("stdout") => println!("{}", pretty),
        Some(path) => fs::write(path, &pretty).context(WritingOutputSnafu {
            path: path.to_string(),
        })?,
    }

    // The reference summary, if provided for comparison.
    if let Some(reference_path) = reference {
        let reference_js = read_summary(reference_path)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference_js).context(ParsingJsonSnafu {})?;
        if pretty_reference != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_reference.as_str(), pretty.as_str(), "\n");
            whatever!("Difference detected between computed standings and the reference summary");
        }
    }
    Ok(())
}

fn standings_to_json(standings: &[LeaderboardEntry]) -> Vec<JSValue> {
    standings
        .iter()
        .map(|entry| {
            json!({
                "position": entry.position,
                "candidate": entry.candidate,
                "points": entry.total_points,
            })
        })
        .collect()
}

fn build_summary_js(contest_name: &str, results: Vec<JSValue>) -> JSValue {
    json!({ "contest": contest_name, "results": results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_ledger::builder::BallotBuilder;
    use std::collections::HashMap;

    fn test_config_json() -> &'static str {
        r#"{
            "contestName": "DZMatch Votes",
            "ledgerPath": "votes.csv",
            "pointsSchedule": { "1": 5, "2": 3, "3": 2, "4": 1, "5": 0.5 },
            "categories": [
                { "name": "Best goalkeeper",
                  "candidates": ["Oussama", "Zakaria", "Abderrahmane", "Tarek"],
                  "maxPicks": 4 },
                { "name": "Best club",
                  "candidates": ["MCA", "USMA", "CSC", "CRB"] }
            ]
        }"#
    }

    fn test_rules() -> ContestRules {
        let config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        validate_contest(&config).unwrap()
    }

    #[test]
    fn contest_config_is_parsed_and_validated() {
        let config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        assert_eq!(config.contest_name, "DZMatch Votes");
        let rules = validate_contest(&config).unwrap();
        assert_eq!(rules.categories.len(), 2);
        assert_eq!(rules.categories[0].max_picks, 4);
        // maxPicks defaults to the schedule depth.
        assert_eq!(rules.categories[1].max_picks, 5);
        assert_eq!(rules.schedule.points_for(5), 0.5);
        assert_eq!(rules.schedule.points_for(6), 0.0);
        assert!(!rules.require_phone);
    }

    #[test]
    fn malformed_configs_are_rejected() {
        let mut config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        config.points_schedule.insert("zero".to_string(), 1.0);
        assert!(validate_contest(&config).is_err());

        let mut config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        config.categories[1].candidates.clear();
        assert!(validate_contest(&config).is_err());

        let mut config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        config.categories[1].name = config.categories[0].name.clone();
        assert!(validate_contest(&config).is_err());

        let mut config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        config.categories.clear();
        assert!(validate_contest(&config).is_err());
    }

    #[test]
    fn ballot_selections_follow_configuration_order() {
        let rules = test_rules();
        let mut selections = HashMap::new();
        selections.insert("Best club".to_string(), vec!["MCA".to_string()]);
        selections.insert("Best goalkeeper".to_string(), vec!["Oussama".to_string()]);
        let ballot_file = BallotFile {
            name: "Amine".to_string(),
            phone: None,
            media: None,
            selections,
        };
        let ballot = io_common::assemble_ballot(&rules, &ballot_file);
        assert_eq!(ballot.selections[0].0, "Best goalkeeper");
        assert_eq!(ballot.selections[1].0, "Best club");
    }

    #[test]
    fn unknown_categories_survive_assembly_and_get_rejected() {
        let rules = test_rules();
        let mut selections = HashMap::new();
        selections.insert("Best referee".to_string(), vec!["Nobody".to_string()]);
        let ballot_file = BallotFile {
            name: "Amine".to_string(),
            phone: None,
            media: None,
            selections,
        };
        let ballot = io_common::assemble_ballot(&rules, &ballot_file);
        assert_eq!(ballot.selections[0].0, "Best referee");
        let mut store = MemoryLedger::new();
        assert_eq!(
            submit_ballot(&mut store, &rules, &ballot),
            Err(BallotErrors::UnknownCategory("Best referee".to_string()))
        );
    }

    #[test]
    fn csv_ledger_round_trip() {
        let rules = test_rules();
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("votes.csv");

        let mut store = CsvLedger::new(&ledger_path);
        let mut b = BallotBuilder::new("Amine");
        b.phone("0550 00 00 00");
        b.picks("Best club", &["MCA", "USMA"]);
        let receipt = submit_ballot(&mut store, &rules, &b.build()).unwrap();
        assert_eq!(receipt.rows_appended, 2);

        // Reopen the ledger, the rows must still be there.
        let store2 = CsvLedger::new(&ledger_path);
        let rows = store2.read_all_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].voter, "Amine");
        assert_eq!(rows[0].phone, Some("0550 00 00 00".to_string()));
        assert_eq!(rows[0].media, None);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].points, Some(5.0));
        assert_eq!(rows[1].points, Some(3.0));
    }

    #[test]
    fn points_survive_the_csv_ledger() {
        let rules = test_rules();
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvLedger::new(dir.path().join("votes.csv"));
        let mut b = BallotBuilder::new("Amine");
        b.picks("Best club", &["MCA", "USMA", "CSC", "CRB"]);
        b.picks("Best goalkeeper", &["Oussama"]);
        submit_ballot(&mut store, &rules, &b.build()).unwrap();

        let mut b2 = BallotBuilder::new("Karim");
        b2.picks("Best club", &["CRB", "MCA", "USMA", "CSC"]);
        submit_ballot(&mut store, &rules, &b2.build()).unwrap();

        // A half-point row, as the 5th rank of the reference schedule produces.
        store
            .append_row(&VoteRow {
                voter: "Sofiane".to_string(),
                phone: None,
                media: None,
                category: "Best club".to_string(),
                candidate: "MCA".to_string(),
                rank: 5,
                points: Some(0.5),
            })
            .unwrap();

        let rows = store.read_all_rows().unwrap();
        let club_rank4: Vec<&VoteRow> = rows
            .iter()
            .filter(|r| r.category == "Best club" && r.rank == 4)
            .collect();
        assert_eq!(club_rank4.len(), 2);
        assert!(club_rank4.iter().all(|r| r.points == Some(1.0)));
        assert_eq!(rows.last().unwrap().points, Some(0.5));

        let standings = compute_leaderboard(&store, &rules, "Best club").unwrap();
        assert_eq!(standings[0].candidate, "MCA");
        assert_eq!(standings[0].total_points, 8.5);
    }

    #[test]
    fn duplicate_detection_survives_a_reopen() {
        let rules = test_rules();
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("votes.csv");

        let mut store = CsvLedger::new(&ledger_path);
        let mut b = BallotBuilder::new("Amine");
        b.picks("Best club", &["MCA"]);
        submit_ballot(&mut store, &rules, &b.build()).unwrap();

        let mut store2 = CsvLedger::new(&ledger_path);
        let mut b2 = BallotBuilder::new("Amine");
        b2.picks("Best club", &["CSC"]);
        let res = submit_ballot(&mut store2, &rules, &b2.build());
        assert_eq!(res, Err(BallotErrors::DuplicateVoter("Amine".to_string())));
        assert_eq!(store2.read_all_rows().unwrap().len(), 1);
    }

    #[test]
    fn missing_ledger_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLedger::new(dir.path().join("does_not_exist.csv"));
        assert!(store.read_all_rows().unwrap().is_empty());
    }

    #[test]
    fn non_numeric_points_are_coerced_to_absent() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("votes.csv");
        std::fs::write(
            &ledger_path,
            "voter,phone,media,category,candidate,rank,points\n\
             Amine,,,Best club,MCA,1,5\n\
             Karim,,,Best club,MCA,1,n/a\n",
        )
        .unwrap();
        let store = CsvLedger::new(&ledger_path);
        let rows = store.read_all_rows().unwrap();
        assert_eq!(rows[0].points, Some(5.0));
        assert_eq!(rows[1].points, None);
        let standings = leaderboard_for(&rows, "Best club");
        assert_eq!(standings[0].total_points, 5.0);
    }

    #[test]
    fn summary_json_shape() {
        let standings = vec![
            LeaderboardEntry {
                position: 1,
                candidate: "MCA".to_string(),
                total_points: 5.0,
            },
            LeaderboardEntry {
                position: 2,
                candidate: "USMA".to_string(),
                total_points: 3.0,
            },
        ];
        let summary = build_summary_js(
            "DZMatch Votes",
            vec![json!({"category": "Best club", "standings": standings_to_json(&standings)})],
        );
        assert_eq!(summary["contest"], "DZMatch Votes");
        assert_eq!(summary["results"][0]["category"], "Best club");
        assert_eq!(summary["results"][0]["standings"][0]["candidate"], "MCA");
        assert_eq!(summary["results"][0]["standings"][0]["points"], 5.0);
        assert_eq!(summary["results"][1], JSValue::Null);
    }

    #[test]
    fn ledger_path_resolution() {
        let config: ContestConfig = serde_json::from_str(test_config_json()).unwrap();
        let p = resolve_ledger_path("/tmp/contest/contest.json", &config, &None);
        assert_eq!(p, PathBuf::from("/tmp/contest/votes.csv"));
        let p = resolve_ledger_path(
            "/tmp/contest/contest.json",
            &config,
            &Some("/var/data/votes.csv".to_string()),
        );
        assert_eq!(p, PathBuf::from("/var/data/votes.csv"));
    }
}
