//! Market data access for gridbt: per-universe dataset catalog, the shared
//! benchmark series, the keyed result store and dataset preparation.

mod benchmark;
mod catalog;
mod frame;
mod prepare;
mod store;

pub use benchmark::{load_benchmark, Benchmark};
pub use catalog::{load_catalog, LoadPolicy};
pub use frame::{Bar, Dataset, TradeRecord};
pub use prepare::prepare_universes;
pub use store::{read_results, write_results};
