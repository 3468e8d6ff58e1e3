use time::{
    error::InvalidFormatDescription,
    format_description::{self, OwnedFormatItem},
    OffsetDateTime,
};

pub const DEFAULT_DATE_FORMAT: &str = "[day].[month].[year]";

/// Renders the human-readable date column.
pub trait DateFormatter {
    fn format(&self, timestamp: OffsetDateTime) -> String;
}

impl<F> DateFormatter for F
where
    F: Fn(OffsetDateTime) -> String,
{
    fn format(&self, timestamp: OffsetDateTime) -> String {
        self(timestamp)
    }
}

/// Formats dates with a `time` format description such as `[year]-[month]-[day]`.
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    description: OwnedFormatItem,
}

impl PatternFormatter {
    pub fn new(pattern: &str) -> Result<Self, InvalidFormatDescription> {
        Ok(Self {
            description: format_description::parse_owned::<2>(pattern)?,
        })
    }
}

impl DateFormatter for PatternFormatter {
    fn format(&self, timestamp: OffsetDateTime) -> String {
        timestamp
            .format(&self.description)
            .unwrap_or_else(|_| timestamp.date().to_string())
    }
}
