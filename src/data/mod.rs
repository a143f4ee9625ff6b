/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///   benchmark .csv (`;`-delimited)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  sentinel → missing, numeric coercion, de-duplication
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ BenchTable  │  Vec<Record>, fixed schema
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  tree type / operation selectors → BenchTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────┐
///   │ aggregate / views    │  grouped means, sums, std, cross tabs
///   └─────────────────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
