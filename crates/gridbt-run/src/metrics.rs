//! The performance-statistics seam and a default implementation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gridbt_data::Benchmark;

/// Seam for the external performance-metrics collaborator.
///
/// Consumes one daily profit series plus the shared benchmark returns and
/// produces named scalars. The aggregator merges these with its own
/// breakdowns into the flat summary map, so implementations should avoid
/// key prefixes the aggregator already uses (`profit_`, `year_`).
pub trait Metrics: Sync {
    /// Computes named statistics for one daily series.
    fn compute(
        &self,
        daily: &BTreeMap<NaiveDate, f64>,
        benchmark: &Benchmark,
    ) -> BTreeMap<String, f64>;
}

/// Default statistics: totals, moments, drawdown and benchmark correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMetrics;

impl Metrics for BasicMetrics {
    fn compute(
        &self,
        daily: &BTreeMap<NaiveDate, f64>,
        benchmark: &Benchmark,
    ) -> BTreeMap<String, f64> {
        let mut stats = BTreeMap::new();
        let values: Vec<f64> = daily.values().copied().collect();
        let total: f64 = values.iter().sum();
        let days = values.len();
        stats.insert("total_profit".to_string(), total);
        stats.insert("days".to_string(), days as f64);

        let mean = if days == 0 { 0.0 } else { total / days as f64 };
        stats.insert("daily_mean".to_string(), mean);
        let variance = if days == 0 {
            0.0
        } else {
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / days as f64
        };
        stats.insert("daily_std".to_string(), variance.sqrt());
        stats.insert("max_drawdown".to_string(), max_drawdown(&values));

        // Correlation only over days where the benchmark actually traded.
        let mut own = Vec::new();
        let mut reference = Vec::new();
        for (date, value) in daily {
            if let Some(bench) = benchmark.daily_return(*date) {
                own.push(*value);
                reference.push(bench);
            }
        }
        stats.insert("benchmark_corr".to_string(), pearson(&own, &reference));
        stats
    }
}

fn max_drawdown(values: &[f64]) -> f64 {
    let mut cumulative = 0.0;
    let mut peak = 0.0f64;
    let mut drawdown = 0.0f64;
    for value in values {
        cumulative += value;
        peak = peak.max(cumulative);
        drawdown = drawdown.max(peak - cumulative);
    }
    drawdown
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawdown_tracks_the_running_peak() {
        let values = [5.0, -2.0, -4.0, 10.0];
        assert!((max_drawdown(&values) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_identical_series_is_one() {
        let xs = [0.1, -0.2, 0.3, 0.05];
        assert!((pearson(&xs, &xs) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_series_is_zero() {
        let xs = [0.1, 0.2, 0.3];
        let ys = [1.0, 1.0, 1.0];
        assert_eq!(pearson(&xs, &ys), 0.0);
    }
}
