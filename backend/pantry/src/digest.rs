//! # Expiring Items Digest
//!
//! Picks the inventory items expiring within the horizon and composes the recipe prompt.
//!
//! ## Dates
//! - RFC 3339 timestamps are used as is
//! - Naive timestamps and bare `YYYY-MM-DD` dates are read as UTC, dates at midnight
//! - Anything else is left out of the digest
//!
//! ## Prompt
//! ```text
//! I have these ingredients about to expire soon:
//! • Milk (expires 2025-01-02)
//! • Eggs (expires 2025-01-03)
//!
//! Please suggest 3 recipes using them.
//! ```
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::models::InventoryItem;

pub const HORIZON_DAYS: i64 = 3;
pub const SUGGESTION_COUNT: usize = 3;

pub const PREAMBLE: &str = "I have these ingredients about to expire soon:";
pub const NO_RECIPES: &str = "No recipes returned.";

const BULLET: &str = "• ";

pub fn default_horizon() -> Duration {
    Duration::days(HORIZON_DAYS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigestEntry {
    pub name: String,
    pub expiration_date: String,
}

impl DigestEntry {
    pub fn line(&self) -> String {
        format!("{} (expires {})", self.name, self.expiration_date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    entries: Vec<DigestEntry>,
}

impl Digest {
    /// `None` when nothing expires by `now + horizon`.
    pub fn collect<'a, I>(items: I, now: DateTime<Utc>, horizon: Duration) -> Option<Self>
    where
        I: IntoIterator<Item = &'a InventoryItem>,
    {
        let cutoff = now + horizon;

        let entries: Vec<DigestEntry> = items
            .into_iter()
            .filter(|item| {
                parse_expiration(&item.expiration_date).is_some_and(|expires| expires <= cutoff)
            })
            .map(|item| DigestEntry {
                name: item.digest_name().to_string(),
                expiration_date: item.expiration_date.clone(),
            })
            .collect();

        if entries.is_empty() {
            return None;
        }

        Some(Self { entries })
    }

    pub fn entries(&self) -> &[DigestEntry] {
        &self.entries
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(DigestEntry::line).collect()
    }

    pub fn list(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{BULLET}{}", entry.line()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn prompt(&self) -> String {
        [
            PREAMBLE.to_string(),
            self.list(),
            String::new(),
            format!("Please suggest {SUGGESTION_COUNT} recipes using them."),
        ]
        .join("\n")
    }
}

pub fn parse_expiration(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{SecondsFormat, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap()
    }

    fn item(name: &str, expiration_date: &str) -> InventoryItem {
        InventoryItem::new(name.to_lowercase(), name, expiration_date)
    }

    #[test]
    fn test_nothing_within_horizon() {
        let items = vec![item("Milk", "2025-03-14"), item("Eggs", "2025-04-01T00:00:00Z")];

        assert_eq!(Digest::collect(&items, now(), default_horizon()), None);
    }

    #[test]
    fn test_empty_inventory() {
        let items: Vec<InventoryItem> = Vec::new();

        assert_eq!(Digest::collect(&items, now(), default_horizon()), None);
    }

    #[test]
    fn test_horizon_is_inclusive() {
        let cutoff = now() + default_horizon();
        let exact = cutoff.to_rfc3339_opts(SecondsFormat::Millis, true);
        let late = (cutoff + Duration::seconds(1)).to_rfc3339_opts(SecondsFormat::Millis, true);

        let items = vec![item("Yogurt", &exact), item("Butter", &late)];
        let digest = Digest::collect(&items, now(), default_horizon()).unwrap();

        assert_eq!(digest.lines(), vec![format!("Yogurt (expires {exact})")]);
    }

    #[test]
    fn test_bare_dates_compare_at_midnight() {
        let items = vec![item("Spinach", "2025-03-13"), item("Cheese", "2025-03-14")];
        let digest = Digest::collect(&items, now(), default_horizon()).unwrap();

        assert_eq!(digest.lines(), vec!["Spinach (expires 2025-03-13)"]);
    }

    #[test]
    fn test_prompt_keeps_input_order() {
        let items = vec![
            item("Milk", "2025-03-12"),
            item("Bread", "2025-06-01"),
            item("Eggs", "2025-03-11"),
        ];
        let digest = Digest::collect(&items, now(), default_horizon()).unwrap();

        assert_eq!(
            digest.prompt(),
            "I have these ingredients about to expire soon:\n\
             • Milk (expires 2025-03-12)\n\
             • Eggs (expires 2025-03-11)\n\
             \n\
             Please suggest 3 recipes using them."
        );
    }

    #[test]
    fn test_already_expired_items_qualify() {
        let items = vec![item("Ham", "2025-03-01")];
        let digest = Digest::collect(&items, now(), default_horizon()).unwrap();

        assert_eq!(digest.entries().len(), 1);
    }

    #[test]
    fn test_unparsable_dates_are_excluded() {
        let items = vec![
            item("Mystery", "06/18/2025"),
            item("Blank", ""),
            item("Cream", "2025-03-11T08:00:00"),
        ];
        let digest = Digest::collect(&items, now(), default_horizon()).unwrap();

        assert_eq!(digest.lines(), vec!["Cream (expires 2025-03-11T08:00:00)"]);
    }

    #[test]
    fn test_custom_horizon() {
        let items = vec![item("Milk", "2025-03-16")];

        assert!(Digest::collect(&items, now(), default_horizon()).is_none());
        assert!(Digest::collect(&items, now(), Duration::days(7)).is_some());
    }

    #[test]
    fn test_parse_expiration_forms() {
        let midnight = Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap();

        assert_eq!(parse_expiration("2025-03-12"), Some(midnight));
        assert_eq!(parse_expiration(" 2025-03-12T00:00:00Z "), Some(midnight));
        assert_eq!(parse_expiration("2025-03-12T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_expiration("2025-03-12T00:00:00.000"), Some(midnight));
        assert_eq!(parse_expiration("2025-02-30"), None);
        assert_eq!(parse_expiration("soon"), None);
    }
}
