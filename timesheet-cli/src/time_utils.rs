use time::{OffsetDateTime, UtcOffset};

/// Must run before any other thread is started, otherwise the offset cannot
/// be determined on most unix platforms.
pub fn local_offset() -> Option<UtcOffset> {
    UtcOffset::current_local_offset().ok()
}

pub fn today(offset: Option<UtcOffset>) -> time::Date {
    let now = OffsetDateTime::now_utc();
    match offset {
        Some(offset) => now.to_offset(offset).date(),
        None => now.date(),
    }
}
