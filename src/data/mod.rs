/// Data layer: core table types, CSV loading, coercion and aggregation.
///
/// Architecture:
/// ```text
///   uploaded .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text → Dataset (per-cell typing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  coerce   │  currency / date / unit-label cells → typed cells
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────┐
///   │ aggregate / summary │  group-by, monthly buckets, describe
///   └─────────────────────┘
/// ```

pub mod aggregate;
pub mod coerce;
pub mod loader;
pub mod model;
pub mod summary;
