/*!

This is the long-form manual for `ballot_ledger` and `dzvotes`.

## The ledger

The ledger is an append-only table of rows. Each row records one ranked pick
of one voter:

```text
voter,phone,media,category,candidate,rank,points
Amine,,,Best club,MCA,1,5
Amine,,,Best club,USMA,2,3
```

Rows are never updated or deleted. The standings are recomputed from the full
row set on every read, so they move as new ballots arrive. There is no cache
to invalidate and no derived state to store.

## Contest configuration

The `dzvotes` program accepts a configuration file in JSON:

```json
{
  "contestName": "DZMatch Votes",
  "ledgerPath": "votes.csv",
  "requirePhone": false,
  "requireMedia": false,
  "pointsSchedule": { "1": 5, "2": 3, "3": 2, "4": 1, "5": 0.5 },
  "categories": [
    {
      "name": "Best goalkeeper",
      "candidates": ["Oussama", "Zakaria", "Abderrahmane", "Tarek"],
      "maxPicks": 4
    },
    {
      "name": "Best club",
      "candidates": ["MCA", "USMA", "CSC", "CRB"]
    }
  ]
}
```

Notes on the fields:

- `pointsSchedule` maps 1-indexed rank positions to point values. The ranks
  must cover `1..=n` without gaps and the values must be non-increasing and
  non-negative. A pick ranked beyond the schedule scores 0 points.
- `maxPicks` is optional and defaults to the depth of the points schedule.
- `requirePhone` and `requireMedia` control which identity fields are
  mandatory besides the voter name.
- `ledgerPath` locates the CSV ledger. A relative path is resolved against
  the directory of the configuration file. The file is created with a header
  on the first submission.

## Ballot files

A submission is a small JSON file:

```json
{
  "name": "Amine",
  "phone": null,
  "media": null,
  "selections": {
    "Best club": ["MCA", "USMA"],
    "Best goalkeeper": ["Oussama"]
  }
}
```

The order of the keys inside `selections` is not significant: the program
reorders the categories into configuration order before submission, so the
appended rows are deterministic.

## Duplicate voters

A voter whose name matches an existing row exactly (case-sensitive, after
trimming surrounding whitespace) is rejected without writing anything. When a
phone number is supplied, a matching phone on any existing row is rejected
the same way. Two submissions racing through the read-check-append sequence
can both pass the check; the ledger carries no lock. If that guarantee
matters for your deployment, serialize the submissions in front of the
program.

## Excel import

The original vote sheets for this kind of contest often live in an Excel
workbook. `dzvotes --import votes.xlsx` reads such a workbook (first
worksheet by default, `--excel-worksheet-name` to pick another) and appends
every row to the CSV ledger. The expected column order is the same as the
CSV header above, with the first row as a header.

## Checking a tally against a reference

`--reference summary.json` compares the computed tally with a previously
saved summary and prints a line diff when they differ. This is handy when
migrating a ledger between formats: import, tally, and compare against the
summary produced by the old system.

 */
