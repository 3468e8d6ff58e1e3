use crate::TimesheetRow;

pub const HEADER: &str = "Project/Repo,Date,Commit/Review Message,Comments,Time used";

/// Renders the header and one line per row, without a trailing newline.
///
/// Every text column is quoted and quotes inside it are doubled. Hours are
/// written bare with two decimals.
pub fn serialize(rows: &[TimesheetRow]) -> String {
    std::iter::once(HEADER.to_owned())
        .chain(rows.iter().map(format_row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(row: &TimesheetRow) -> String {
    format!(
        "{},{},{},{},{:.2}",
        quoted(&row.category),
        quoted(&row.display_date),
        quoted(&row.description),
        quoted(&row.comment),
        row.hours
    )
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
