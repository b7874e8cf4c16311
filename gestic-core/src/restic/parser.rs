//! ``src/restic/parser.rs``
//! ============================================================================
//! # `restic snapshots` Table Parser
//!
//! restic prints a fixed-width table:
//!
//! ```text
//! ID        Time                 Host   Tags  Paths  Size
//! ---------------------------------------------------------
//! 4f1e5b2a  2024-05-01 10:00:00  box          /home  1.234 GiB
//!                                             /etc
//! ---------------------------------------------------------
//! 1 snapshots
//! ```
//!
//! Data rows sit between the first two dashed lines. Lines that start with
//! whitespace continue the previous row (extra paths or tags) and are
//! skipped.

use chrono::NaiveDateTime;
use compact_str::CompactString;

use crate::{error::AppError, model::snapshot::TIMESTAMP_LAYOUT};

const SIZE_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// One row of the listing, before it is matched to a mount directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedSnapshot {
    pub id: CompactString,
    /// Wall-clock time as restic printed it, in the local timezone.
    pub local_time: NaiveDateTime,
    pub size_label: String,
}

/// Parse the stdout of `restic snapshots`.
pub fn parse_snapshot_table(output: &str) -> Result<Vec<ListedSnapshot>, AppError> {
    let mut separators = output
        .lines()
        .enumerate()
        .filter(|(_, line)| is_separator(line))
        .map(|(i, _)| i);

    let (Some(start), Some(end)) = (separators.next(), separators.next()) else {
        return Err(AppError::snapshot_list(
            "unexpected output: no snapshot table found",
        ));
    };

    let rows: Vec<ListedSnapshot> = output
        .lines()
        .skip(start + 1)
        .take(end - start - 1)
        .filter(|line| !line.trim().is_empty() && !line.starts_with(char::is_whitespace))
        .map(parse_row)
        .collect::<Result<_, _>>()?;

    if rows.is_empty() {
        return Err(AppError::snapshot_list("expected at least 1 snapshot"));
    }

    Ok(rows)
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '-')
}

fn parse_row(line: &str) -> Result<ListedSnapshot, AppError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(AppError::snapshot_list(format!("malformed row: {line:?}")));
    }

    let stamp = format!("{} {}", fields[1], fields[2]);
    let local_time = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_LAYOUT)
        .map_err(|e| AppError::snapshot_list(format!("bad time {stamp:?} in row {line:?}: {e}")))?;

    let size_label = match fields.as_slice() {
        [.., value, unit] if fields.len() > 4 && SIZE_UNITS.contains(unit) => {
            format!("{value} {unit}")
        }
        _ => String::new(),
    };

    Ok(ListedSnapshot {
        id: CompactString::from(fields[0]),
        local_time,
        size_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LISTING: &str = "\
repository 1a2b3c4d opened (version 2, compression level auto)
ID        Time                 Host        Tags        Paths      Size
------------------------------------------------------------------------
4f1e5b2a  2024-05-01 10:00:00  nas                     /srv/data  1.234 GiB
                                                       /etc
9c0d7e11  2024-05-08 10:00:05  nas         weekly      /srv/data  980.500 MiB
------------------------------------------------------------------------
2 snapshots
";

    #[test]
    fn parses_rows_between_separators() {
        let rows = parse_snapshot_table(LISTING).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].id, "4f1e5b2a");
        assert_eq!(
            rows[0].local_time,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(rows[0].size_label, "1.234 GiB");
        assert_eq!(rows[1].id, "9c0d7e11");
        assert_eq!(rows[1].size_label, "980.500 MiB");
    }

    #[test]
    fn size_column_is_optional() {
        let listing = "\
ID        Time                 Host  Tags  Paths
-------------------------------------------------
abcd0001  2023-12-31 23:59:59  box         /home
-------------------------------------------------
1 snapshots
";
        let rows = parse_snapshot_table(listing).unwrap();
        assert_eq!(rows[0].size_label, "");
    }

    #[test]
    fn empty_listing_is_rejected() {
        let listing = "\
ID        Time                 Host  Tags  Paths
-------------------------------------------------
-------------------------------------------------
0 snapshots
";
        let err = parse_snapshot_table(listing).unwrap_err();
        assert!(matches!(err, AppError::SnapshotList { .. }));
    }

    #[test]
    fn missing_table_is_rejected() {
        assert!(parse_snapshot_table("").is_err());
        assert!(parse_snapshot_table("Fatal: wrong password\n").is_err());
    }

    #[test]
    fn bad_timestamp_is_an_error_not_a_panic() {
        let listing = "\
-------------------------------------------------
abcd0001  yesterday     box         /home
-------------------------------------------------
";
        let err = parse_snapshot_table(listing).unwrap_err();
        assert!(err.to_string().contains("bad time"));
    }
}
