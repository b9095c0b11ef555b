/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  census .csv (';', Latin-1)
///        │
///        ▼
///   ┌──────────┐   ┌─────────┐   ┌───────────┐
///   │  loader  │ → │ mapping │ → │ normalize │   parse → rename → 0/1 labels
///   └──────────┘   └─────────┘   └───────────┘
///        │  (memoized by `cache`, keyed by content + load config)
///        ▼
///   ┌──────────┐
///   │  Table   │  normalized rows, typed columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  per-column selections → filtered table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  summary tables for the dashboard tabs
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod mapping;
pub mod model;
pub mod normalize;
