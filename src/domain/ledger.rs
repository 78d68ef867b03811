use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::{Aggregator, Cents, Month};

type DayRecords = BTreeMap<String, Cents>;

/// Per-day, per-category expense records plus their running totals.
///
/// Every mutation moves the [`Aggregator`] by the same delta, so totals are
/// kept in step without a rebuild.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: BTreeMap<NaiveDate, DayRecords>,
    totals: Aggregator,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must not be negative: {0} cents")]
    InvalidAmount(Cents),

    #[error("No {category} expense recorded on {date}")]
    RecordNotFound { date: NaiveDate, category: String },

    #[error("Amount would overflow the ledger totals")]
    Overflow,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the record for `(date, category)`, creating it if needed.
    ///
    /// A zero amount changes nothing. Returns the record's new balance.
    pub fn add(
        &mut self,
        date: NaiveDate,
        category: &str,
        amount: Cents,
    ) -> Result<Cents, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let current = self.amount(date, category).unwrap_or(0);
        if amount == 0 {
            return Ok(current);
        }

        let updated = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.totals.apply_delta(date, Month::of(date), amount)?;
        self.records
            .entry(date)
            .or_default()
            .insert(category.to_string(), updated);

        Ok(updated)
    }

    /// Subtract `amount` from an existing record.
    ///
    /// When nothing positive is left the record is deleted and `None` is
    /// returned. Totals always move by the requested `amount`, even when it
    /// exceeds what the record held.
    pub fn remove(
        &mut self,
        date: NaiveDate,
        category: &str,
        amount: Cents,
    ) -> Result<Option<Cents>, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let current = self
            .amount(date, category)
            .ok_or_else(|| LedgerError::RecordNotFound {
                date,
                category: category.to_string(),
            })?;

        // current > 0 and amount >= 0, so this cannot overflow.
        let updated = current - amount;
        self.totals.apply_delta(date, Month::of(date), -amount)?;

        let Some(day) = self.records.get_mut(&date) else {
            return Ok(None);
        };
        if updated <= 0 {
            if updated < 0 {
                tracing::debug!(
                    %date,
                    category,
                    requested = amount,
                    stored = current,
                    "removal exceeds stored balance; totals move by the requested amount"
                );
            }
            day.remove(category);
            Ok(None)
        } else {
            day.insert(category.to_string(), updated);
            Ok(Some(updated))
        }
    }

    /// Drop every record and total.
    pub fn clear(&mut self) {
        self.records.clear();
        self.totals.reset();
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            records: &self.records,
        }
    }

    pub fn amount(&self, date: NaiveDate, category: &str) -> Option<Cents> {
        self.records.get(&date)?.get(category).copied()
    }

    pub fn totals(&self) -> &Aggregator {
        &self.totals
    }

    pub fn daily_total(&self, date: NaiveDate) -> Option<Cents> {
        self.totals.daily_total(date)
    }

    pub fn monthly_total(&self, month: Month) -> Option<Cents> {
        self.totals.monthly_total(month)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.totals.is_empty()
    }
}

/// Borrowed read view of the ledger's records, `date -> category -> amount`.
///
/// A date stays listed after its last category is removed so its daily total
/// can still be reported.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Snapshot<'a> {
    records: &'a BTreeMap<NaiveDate, DayRecords>,
}

impl<'a> Snapshot<'a> {
    pub fn days(self) -> impl Iterator<Item = (NaiveDate, DayView<'a>)> + 'a {
        self.records
            .iter()
            .map(|(date, records)| (*date, DayView { records }))
    }

    pub fn day(self, date: NaiveDate) -> Option<DayView<'a>> {
        self.records.get(&date).map(|records| DayView { records })
    }

    pub fn get(self, date: NaiveDate, category: &str) -> Option<Cents> {
        self.day(date)?.get(category)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The categories recorded on a single date.
#[derive(Debug, Clone, Copy)]
pub struct DayView<'a> {
    records: &'a DayRecords,
}

impl<'a> DayView<'a> {
    pub fn categories(self) -> impl Iterator<Item = (&'a str, Cents)> + 'a {
        self.records
            .iter()
            .map(|(category, amount)| (category.as_str(), *amount))
    }

    pub fn get(&self, category: &str) -> Option<Cents> {
        self.records.get(category).copied()
    }

    pub fn sum(&self) -> Cents {
        self.records.values().sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_date;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_add_accumulates() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");

        assert_eq!(ledger.add(d, "Food", 1000), Ok(1000));
        assert_eq!(ledger.add(d, "Food", 250), Ok(1250));
        assert_eq!(ledger.snapshot().get(d, "Food"), Some(1250));
        assert_eq!(ledger.daily_total(d), Some(1250));
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");

        assert_eq!(ledger.add(d, "Food", 0), Ok(0));
        assert!(ledger.is_empty());
        assert_eq!(ledger.daily_total(d), None);

        ledger.add(d, "Food", 700).unwrap();
        assert_eq!(ledger.add(d, "Food", 0), Ok(700));
        assert_eq!(ledger.daily_total(d), Some(700));
    }

    #[test]
    fn test_add_negative_rejected() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");

        assert_eq!(
            ledger.add(d, "Food", -1),
            Err(LedgerError::InvalidAmount(-1))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_accepts_any_category() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Books", 1500).unwrap();

        assert_eq!(ledger.amount(d, "Books"), Some(1500));
    }

    #[test]
    fn test_add_overflow_is_atomic() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Rent", Cents::MAX).unwrap();

        assert_eq!(ledger.add(d, "Rent", 1), Err(LedgerError::Overflow));
        assert_eq!(ledger.add(d, "Food", 1), Err(LedgerError::Overflow));
        assert_eq!(ledger.amount(d, "Food"), None);
        assert_eq!(ledger.daily_total(d), Some(Cents::MAX));
    }

    #[test]
    fn test_remove_partial() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Food", 1000).unwrap();

        assert_eq!(ledger.remove(d, "Food", 400), Ok(Some(600)));
        assert_eq!(ledger.amount(d, "Food"), Some(600));
        assert_eq!(ledger.daily_total(d), Some(600));
    }

    #[test]
    fn test_remove_missing_record() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Food", 1000).unwrap();

        let err = ledger.remove(d, "Rent", 100).unwrap_err();
        assert_eq!(
            err,
            LedgerError::RecordNotFound {
                date: d,
                category: "Rent".into()
            }
        );
        assert_eq!(ledger.daily_total(d), Some(1000));

        let other_day = date("2024-03-02");
        assert!(ledger.remove(other_day, "Food", 100).is_err());
        assert_eq!(ledger.daily_total(other_day), None);
    }

    #[test]
    fn test_remove_more_than_stored_moves_totals_by_requested() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Food", 1000).unwrap();

        assert_eq!(ledger.remove(d, "Food", 1500), Ok(None));
        assert_eq!(ledger.amount(d, "Food"), None);
        assert_eq!(ledger.daily_total(d), Some(-500));
        assert_eq!(ledger.monthly_total(Month::of(d)), Some(-500));
    }

    #[test]
    fn test_remove_exact_keeps_empty_day() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Rent", 50000).unwrap();

        assert_eq!(ledger.remove(d, "Rent", 50000), Ok(None));
        let snapshot = ledger.snapshot();
        let day = snapshot.day(d).unwrap();
        assert!(day.is_empty());
        assert_eq!(ledger.daily_total(d), Some(0));
    }

    #[test]
    fn test_removed_record_cannot_be_removed_again() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Rent", 100).unwrap();
        ledger.remove(d, "Rent", 100).unwrap();

        assert!(matches!(
            ledger.remove(d, "Rent", 1),
            Err(LedgerError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        let d = date("2024-03-01");
        ledger.add(d, "Food", 100).unwrap();
        ledger.clear();

        assert!(ledger.is_empty());
        assert!(ledger.snapshot().is_empty());
        assert_eq!(ledger.daily_total(d), None);
        assert_eq!(ledger.monthly_total(Month::of(d)), None);
    }

    #[test]
    fn test_snapshot_iterates_days_in_order() {
        let mut ledger = Ledger::new();
        ledger.add(date("2024-03-15"), "Food", 100).unwrap();
        ledger.add(date("2024-03-01"), "Rent", 200).unwrap();
        ledger.add(date("2024-03-01"), "Food", 300).unwrap();

        let snapshot = ledger.snapshot();
        let days: Vec<_> = snapshot
            .days()
            .map(|(d, day)| (d.to_string(), day.categories().collect::<Vec<_>>()))
            .collect();

        assert_eq!(
            days,
            vec![
                (
                    "2024-03-01".to_string(),
                    vec![("Food", 300), ("Rent", 200)]
                ),
                ("2024-03-15".to_string(), vec![("Food", 100)]),
            ]
        );
    }

    #[test]
    fn test_daily_total_equals_day_sum() {
        let mut ledger = Ledger::new();
        let d = date("2024-06-02");
        for (category, amount) in [("Food", 120), ("Transport", 80), ("Food", 45), ("Other", 5)] {
            ledger.add(d, category, amount).unwrap();
        }
        ledger.remove(d, "Food", 65).unwrap();

        let snapshot = ledger.snapshot();
        assert_eq!(ledger.daily_total(d), Some(snapshot.day(d).unwrap().sum()));
    }
}
