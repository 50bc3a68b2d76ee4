//! Bucket aggregation and ordinary least squares over bucket totals.

use chrono::NaiveDate;
use num_traits::ToPrimitive;

use super::forecast_model::TrendLabel;
use crate::entries::Entry;

/// Sums entry amounts into consecutive `bucket_days`-wide buckets anchored at
/// the earliest entry date. Buckets with no entries contribute zero, so a
/// sparse month still occupies its share of the timeline.
pub fn bucket_totals(entries: &[&Entry], bucket_days: u32) -> Vec<f64> {
    let Some(origin) = entries.iter().map(|e| e.date).min() else {
        return Vec::new();
    };
    let width = i64::from(bucket_days.max(1));
    let bucket_of = |date: NaiveDate| ((date - origin).num_days() / width) as usize;

    let last = entries.iter().map(|e| bucket_of(e.date)).max().unwrap_or(0);
    let mut totals = vec![0.0; last + 1];
    for entry in entries {
        totals[bucket_of(entry.date)] += entry.amount.to_f64().unwrap_or(0.0);
    }
    totals
}

/// A least squares line fitted over bucket totals, with the residual spread
/// kept for interval construction. The x axis is the bucket index.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    residual_std: f64,
    observations: usize,
}

impl LinearTrend {
    /// Fits the line. Returns `None` for fewer than two points, where a slope
    /// is meaningless.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let x_mean = (nf - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / nf;

        let mut covariance = 0.0;
        let mut x_variance = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            covariance += dx * (y - y_mean);
            x_variance += dx * dx;
        }
        let slope = if x_variance > f64::EPSILON {
            covariance / x_variance
        } else {
            0.0
        };
        let intercept = y_mean - slope * x_mean;

        let residual_sum: f64 = values
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                let fitted = intercept + slope * i as f64;
                (y - fitted) * (y - fitted)
            })
            .sum();
        let residual_std = (residual_sum / nf).sqrt();

        Some(Self {
            slope,
            intercept,
            residual_std,
            observations: n,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    pub fn observations(&self) -> usize {
        self.observations
    }
}

/// Labels a slope relative to the mean bucket total. A degenerate (zero or
/// negative) mean cannot support a relative judgement and reads as stable.
pub fn trend_label(slope: f64, mean: f64, threshold: f64) -> TrendLabel {
    if mean <= f64::EPSILON {
        return TrendLabel::Stable;
    }
    let relative = slope / mean;
    if relative > threshold {
        TrendLabel::Increasing
    } else if relative < -threshold {
        TrendLabel::Decreasing
    } else {
        TrendLabel::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(id: &str, amount: Decimal, date: NaiveDate) -> Entry {
        Entry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount,
            date,
            entry_type: EntryType::Expense,
            category: Some("groceries".to_string()),
            note: "weekly shop".to_string(),
            currency: "USD".to_string(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    #[test]
    fn test_buckets_anchor_at_earliest_entry() {
        let entries = vec![
            entry("a", dec!(10), date(3)),
            entry("b", dec!(20), date(5)),
            entry("c", dec!(30), date(12)),
        ];
        let refs: Vec<&Entry> = entries.iter().collect();
        let totals = bucket_totals(&refs, 7);
        assert_eq!(totals, vec![30.0, 30.0]);
    }

    #[test]
    fn test_empty_buckets_are_zero_filled() {
        let entries = vec![entry("a", dec!(10), date(1)), entry("b", dec!(40), date(22))];
        let refs: Vec<&Entry> = entries.iter().collect();
        let totals = bucket_totals(&refs, 7);
        assert_eq!(totals, vec![10.0, 0.0, 0.0, 40.0]);
    }

    #[test]
    fn test_perfect_line_has_zero_residual() {
        let trend = LinearTrend::fit(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert!((trend.slope() - 10.0).abs() < 1e-9);
        assert!(trend.residual_std() < 1e-9);
        assert!((trend.predict(4.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_has_zero_slope() {
        let trend = LinearTrend::fit(&[55.0, 55.0, 55.0, 55.0]).unwrap();
        assert_eq!(trend.slope(), 0.0);
        assert_eq!(trend.predict(10.0), 55.0);
    }

    #[test]
    fn test_too_few_points_yield_no_fit() {
        assert!(LinearTrend::fit(&[42.0]).is_none());
        assert!(LinearTrend::fit(&[]).is_none());
    }

    #[test]
    fn test_trend_label_thresholds() {
        assert_eq!(trend_label(6.0, 100.0, 0.05), TrendLabel::Increasing);
        assert_eq!(trend_label(-6.0, 100.0, 0.05), TrendLabel::Decreasing);
        assert_eq!(trend_label(4.0, 100.0, 0.05), TrendLabel::Stable);
        assert_eq!(trend_label(50.0, 0.0, 0.05), TrendLabel::Stable);
    }
}
