// Import of an Excel vote ledger, as produced by the spreadsheet-backed flow
// this program replaces.

use calamine::{open_workbook, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use ballot_ledger::VoteRow;

use crate::app::{AppResult, EmptyExcelSnafu, OpeningExcelSnafu};

/// Reads all the vote rows of an Excel workbook.
///
/// The expected layout is the CSV ledger's: a header row followed by one row
/// per ranked pick, columns voter, phone, media, category, candidate, rank,
/// points. The first worksheet is used unless a name is given.
pub fn read_ledger_xlsx(path: &str, worksheet: &Option<String>) -> AppResult<Vec<VoteRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;
    let wrange = match worksheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    }
    .context(EmptyExcelSnafu {
        path: path.to_string(),
    })?
    .context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;

    let header = wrange.rows().next().context(EmptyExcelSnafu {
        path: path.to_string(),
    })?;
    debug!("header: {:?}", header);

    let mut iter = wrange.rows();
    iter.next();
    let mut res: Vec<VoteRow> = Vec::new();
    for row in iter {
        debug!("workbook: {:?}", row);
        if row.len() < 7 {
            whatever!("ledger row has {} cells, expected 7: {:?}", row.len(), row);
        }
        res.push(VoteRow {
            voter: read_text_cell(&row[0])?,
            phone: read_opt_cell(&row[1]),
            media: read_opt_cell(&row[2]),
            category: read_text_cell(&row[3])?,
            candidate: read_text_cell(&row[4])?,
            rank: read_rank_cell(&row[5])?,
            points: read_points_cell(&row[6]),
        });
    }
    Ok(res)
}

fn read_text_cell(cell: &calamine::DataType) -> AppResult<String> {
    match cell {
        calamine::DataType::String(s) => Ok(s.clone()),
        _ => whatever!("read_text_cell: could not understand cell {:?}", cell),
    }
}

// Phone numbers typed in Excel often end up as numeric cells.
fn read_opt_cell(cell: &calamine::DataType) -> Option<String> {
    match cell {
        calamine::DataType::String(s) if !s.is_empty() => Some(s.clone()),
        calamine::DataType::Float(f) => Some(format!("{}", f)),
        calamine::DataType::Int(i) => Some(format!("{}", i)),
        _ => None,
    }
}

fn read_rank_cell(cell: &calamine::DataType) -> AppResult<u32> {
    match cell {
        calamine::DataType::Float(f) if *f >= 1.0 => Ok(*f as u32),
        calamine::DataType::Int(i) if *i >= 1 => Ok(*i as u32),
        calamine::DataType::String(s) => s
            .trim()
            .parse::<u32>()
            .ok()
            .with_whatever_context(|| format!("could not understand rank cell {:?}", s)),
        _ => whatever!("read_rank_cell: could not understand cell {:?}", cell),
    }
}

// Non-numeric points are coerced to absent, matching the tally rule.
fn read_points_cell(cell: &calamine::DataType) -> Option<f64> {
    match cell {
        calamine::DataType::Float(f) => Some(*f),
        calamine::DataType::Int(i) => Some(*i as f64),
        calamine::DataType::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
