use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Cents, LedgerError, Month};

/// Running daily and monthly totals.
///
/// Totals are moved by the same delta as every ledger mutation and are never
/// rebuilt from the records. They are not clamped: removing more than a
/// record holds can leave a total below zero.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    daily: BTreeMap<NaiveDate, Cents>,
    monthly: BTreeMap<Month, Cents>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the date's total and to the month's total.
    ///
    /// Both sums are checked before either is written, so an overflow leaves
    /// the aggregator unchanged. Entries that reach zero stay present.
    pub fn apply_delta(
        &mut self,
        date: NaiveDate,
        month: Month,
        delta: Cents,
    ) -> Result<(), LedgerError> {
        let daily = self
            .daily
            .get(&date)
            .copied()
            .unwrap_or(0)
            .checked_add(delta)
            .ok_or(LedgerError::Overflow)?;
        let monthly = self
            .monthly
            .get(&month)
            .copied()
            .unwrap_or(0)
            .checked_add(delta)
            .ok_or(LedgerError::Overflow)?;

        self.daily.insert(date, daily);
        self.monthly.insert(month, monthly);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.daily.clear();
        self.monthly.clear();
    }

    pub fn daily_total(&self, date: NaiveDate) -> Option<Cents> {
        self.daily.get(&date).copied()
    }

    pub fn monthly_total(&self, month: Month) -> Option<Cents> {
        self.monthly.get(&month).copied()
    }

    pub fn daily_totals(&self) -> impl Iterator<Item = (NaiveDate, Cents)> + '_ {
        self.daily.iter().map(|(date, total)| (*date, *total))
    }

    pub fn monthly_totals(&self) -> impl Iterator<Item = (Month, Cents)> + '_ {
        self.monthly.iter().map(|(month, total)| (*month, *total))
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.monthly.is_empty()
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
    fn test_apply_delta_updates_day_and_month() {
        let mut agg = Aggregator::new();
        let d1 = date("2024-03-01");
        let d2 = date("2024-03-15");

        agg.apply_delta(d1, Month::of(d1), 10000).unwrap();
        agg.apply_delta(d1, Month::of(d1), 20000).unwrap();
        agg.apply_delta(d2, Month::of(d2), 5000).unwrap();

        assert_eq!(agg.daily_total(d1), Some(30000));
        assert_eq!(agg.daily_total(d2), Some(5000));
        assert_eq!(agg.monthly_total(Month::of(d1)), Some(35000));
    }

    #[test]
    fn test_zero_total_is_kept() {
        let mut agg = Aggregator::new();
        let d = date("2024-01-10");
        agg.apply_delta(d, Month::of(d), 500).unwrap();
        agg.apply_delta(d, Month::of(d), -500).unwrap();

        assert_eq!(agg.daily_total(d), Some(0));
        assert_eq!(agg.monthly_total(Month::of(d)), Some(0));
    }

    #[test]
    fn test_totals_are_not_clamped() {
        let mut agg = Aggregator::new();
        let d = date("2024-01-10");
        agg.apply_delta(d, Month::of(d), 1000).unwrap();
        agg.apply_delta(d, Month::of(d), -1500).unwrap();

        assert_eq!(agg.daily_total(d), Some(-500));
    }

    #[test]
    fn test_overflow_leaves_totals_unchanged() {
        let mut agg = Aggregator::new();
        let d = date("2024-01-10");
        agg.apply_delta(d, Month::of(d), Cents::MAX).unwrap();

        let other_month_day = date("2024-02-01");
        agg.apply_delta(other_month_day, Month::of(other_month_day), 1)
            .unwrap();

        // Daily sum for a fresh day fits but the month does not.
        let same_month = date("2024-01-11");
        assert_eq!(
            agg.apply_delta(same_month, Month::of(same_month), 1),
            Err(LedgerError::Overflow)
        );
        assert_eq!(agg.daily_total(same_month), None);
        assert_eq!(agg.monthly_total(Month::of(d)), Some(Cents::MAX));
    }

    #[test]
    fn test_reset() {
        let mut agg = Aggregator::new();
        let d = date("2024-01-10");
        agg.apply_delta(d, Month::of(d), 100).unwrap();
        agg.reset();

        assert!(agg.is_empty());
        assert_eq!(agg.daily_total(d), None);
        assert_eq!(agg.monthly_total(Month::of(d)), None);
    }

    #[test]
    fn test_missing_keys_report_no_data() {
        let agg = Aggregator::new();
        assert_eq!(agg.daily_total(date("2024-05-05")), None);
        assert_eq!(agg.monthly_total(Month::new(2024, 5).unwrap()), None);
    }
}
