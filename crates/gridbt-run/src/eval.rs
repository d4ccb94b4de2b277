//! The evaluation seam and a deterministic reference implementation.

use gridbt_core::errors::SweepError;
use gridbt_core::value::Config;
use gridbt_data::{Dataset, TradeRecord};

/// Seam for the external backtest evaluation function.
///
/// Implementations must be `Sync`: work units run concurrently and the
/// orchestrator shares one evaluator across the pool. Anything stateful
/// belongs behind interior synchronization inside the implementation.
pub trait Evaluator: Sync {
    /// Evaluates one configuration against one dataset, returning the
    /// result table for the unit.
    fn evaluate(&self, dataset: &Dataset, config: &Config)
        -> Result<Vec<TradeRecord>, SweepError>;
}

/// Deterministic stand-in evaluator used by demos and tests.
///
/// Takes one position per bar and books `(close - open) * quantity` as
/// profit (inverted for `order: sell`). It exists so the pipeline can run
/// end to end; it is not a trading strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEvaluator;

impl Evaluator for ReferenceEvaluator {
    fn evaluate(
        &self,
        dataset: &Dataset,
        config: &Config,
    ) -> Result<Vec<TradeRecord>, SweepError> {
        let qty = config
            .get("quantity")
            .and_then(|value| value.as_float())
            .unwrap_or(1.0);
        let sell = config
            .get("order")
            .and_then(|value| value.as_text())
            .is_some_and(|order| order == "sell");
        let records = dataset
            .bars
            .iter()
            .map(|bar| {
                let direction = if sell { -1.0 } else { 1.0 };
                TradeRecord {
                    date: bar.date,
                    symbol: bar.symbol.clone(),
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    qty,
                    profit: (bar.close - bar.open) * qty * direction,
                }
            })
            .collect();
        Ok(records)
    }
}
