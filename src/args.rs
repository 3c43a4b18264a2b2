use clap::Parser;

/// This is a vote-collection and live-tally program for ranked contests.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file describing the contest: categories, eligible
    /// candidates, points schedule and ledger location.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or empty) If specified, the ballot in this JSON file is validated and
    /// appended to the ledger. Without --ballot and --import, the program tallies the
    /// current ledger instead.
    #[clap(short, long, value_parser)]
    pub ballot: Option<String>,

    /// (file path or empty) If specified, all the vote rows of this Excel (.xlsx)
    /// workbook are appended to the CSV ledger. Useful to migrate a spreadsheet-backed
    /// ledger.
    #[clap(long, value_parser)]
    pub import: Option<String>,

    /// (file path or empty) Overrides the ledger location given in the configuration
    /// file.
    #[clap(short, long, value_parser)]
    pub ledger: Option<String>,

    /// (file path) A reference file containing a tally summary in JSON format. If
    /// provided, dzvotes will check that the computed standings match the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the tally summary will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default first worksheet) When importing an Excel file, indicates the name of
    /// the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
