/*!

# Quick start

This example runs a small contest end to end with `dzvotes`, from an empty
ledger to a live tally.

**Describe the contest** Save the following as `contest.json`:

```json
{
  "contestName": "DZMatch Votes",
  "ledgerPath": "votes.csv",
  "pointsSchedule": { "1": 5, "2": 3, "3": 2, "4": 1, "5": 0.5 },
  "categories": [
    { "name": "Best club", "candidates": ["MCA", "USMA", "CSC", "CRB"] }
  ]
}
```

**Collect a ballot** Each voter's submission is a JSON file. Save this one as
`ballot_amine.json`:

```json
{
  "name": "Amine",
  "selections": { "Best club": ["MCA", "USMA"] }
}
```

**Record it**:

```bash
dzvotes --config contest.json --ballot ballot_amine.json
```

The first submission creates `votes.csv` next to `contest.json` and appends
one row per ranked pick. Submitting the same voter a second time prints a
rejection and leaves the ledger untouched:

```text
An error occured Amine has already voted
```

**Tally**:

```bash
dzvotes --config contest.json
```

```json
{
  "contest": "DZMatch Votes",
  "results": [
    {
      "category": "Best club",
      "standings": [
        { "position": 1, "candidate": "MCA", "points": 5.0 },
        { "position": 2, "candidate": "USMA", "points": 3.0 }
      ]
    }
  ]
}
```

The standings are recomputed from the full ledger on every run. Use `--out`
to write the summary to a file instead of stdout.

**Using the library directly**:

```
use ballot_ledger::*;
use ballot_ledger::builder::BallotBuilder;

let rules = ContestRules {
    categories: vec![Category {
        name: "Best club".to_string(),
        candidates: vec!["MCA".to_string(), "USMA".to_string()],
        max_picks: 2,
    }],
    schedule: PointsSchedule::from_pairs(&[(1, 5.0), (2, 3.0)])?,
    require_phone: false,
    require_media: false,
};

let mut store = MemoryLedger::new();
let mut builder = BallotBuilder::new("Amine");
builder.picks("Best club", &["MCA", "USMA"]);
let receipt = submit_ballot(&mut store, &rules, &builder.build())?;
assert_eq!(receipt.rows_appended, 2);

let standings = compute_leaderboard(&store, &rules, "Best club")?;
assert_eq!(standings[0].candidate, "MCA");
# Ok::<(), ballot_ledger::BallotErrors>(())
```

 */
