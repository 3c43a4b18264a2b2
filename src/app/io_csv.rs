// Primitives for reading and appending the CSV ledger.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use snafu::prelude::*;

use ballot_ledger::{LedgerStore, StorageFault, VoteRow};

use crate::app::{
    AppResult, CsvAppendSnafu, CsvLineParseSnafu, CsvLineTooShortSnafu, CsvOpenSnafu,
    LedgerRankSnafu, OpeningLedgerSnafu,
};

pub const LEDGER_HEADER: [&str; 7] = [
    "voter",
    "phone",
    "media",
    "category",
    "candidate",
    "rank",
    "points",
];

/// The CSV-backed ledger.
///
/// The file is created with a header on the first append. Reading a path
/// that does not exist yet yields an empty ledger. Each append is a single
/// independent record write; there is no multi-row transaction.
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> CsvLedger {
        CsvLedger {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> AppResult<Vec<VoteRow>> {
        if !self.path.exists() {
            debug!("read_rows: no ledger yet at {:?}", self.path);
            return Ok(Vec::new());
        }
        let rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .context(CsvOpenSnafu {
                path: self.path.display().to_string(),
            })?;
        let mut res: Vec<VoteRow> = Vec::new();
        for (idx, line_r) in rdr.into_records().enumerate() {
            let lineno = idx + 1;
            let line = line_r.context(CsvLineParseSnafu { lineno })?;
            // The first line is the header.
            if idx == 0 {
                continue;
            }
            debug!("read_rows: {:?} {:?}", lineno, line);
            let field = |i: usize| line.get(i).context(CsvLineTooShortSnafu { lineno });
            let voter = field(0)?.to_string();
            let phone = opt_field(field(1)?);
            let media = opt_field(field(2)?);
            let category = field(3)?.to_string();
            let candidate = field(4)?.to_string();
            let rank = field(5)?
                .trim()
                .parse::<u32>()
                .ok()
                .context(LedgerRankSnafu { lineno })?;
            // Non-numeric points are coerced to absent, not to zero.
            let points = field(6)?.trim().parse::<f64>().ok();
            res.push(VoteRow {
                voter,
                phone,
                media,
                category,
                candidate,
                rank,
                points,
            });
        }
        Ok(res)
    }

    fn append(&mut self, row: &VoteRow) -> AppResult<()> {
        let needs_header = !self.path.exists();
        let path_str = self.path.display().to_string();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context(OpeningLedgerSnafu {
                path: path_str.clone(),
            })?;
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        if needs_header {
            wtr.write_record(LEDGER_HEADER).context(CsvAppendSnafu {
                path: path_str.clone(),
            })?;
        }
        let rank_str = row.rank.to_string();
        let points_str = match row.points {
            Some(p) => p.to_string(),
            None => String::new(),
        };
        wtr.write_record([
            row.voter.as_str(),
            row.phone.as_deref().unwrap_or(""),
            row.media.as_deref().unwrap_or(""),
            row.category.as_str(),
            row.candidate.as_str(),
            rank_str.as_str(),
            points_str.as_str(),
        ])
        .context(CsvAppendSnafu {
            path: path_str.clone(),
        })?;
        wtr.flush()
            .map_err(csv::Error::from)
            .context(CsvAppendSnafu { path: path_str })?;
        Ok(())
    }
}

fn opt_field(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl LedgerStore for CsvLedger {
    fn read_all_rows(&self) -> Result<Vec<VoteRow>, StorageFault> {
        self.read_rows().map_err(|e| StorageFault {
            message: e.to_string(),
        })
    }

    fn append_row(&mut self, row: &VoteRow) -> Result<(), StorageFault> {
        self.append(row).map_err(|e| StorageFault {
            message: e.to_string(),
        })
    }
}
