/// Data layer: survey types, loading, scoring, filtering and statistics.
///
/// Architecture:
/// ```text
///  path / http(s) CSV export
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV, coerce Q1..Q13 → SurveyTable
///   └──────────┘
///        │          (held by cache: one snapshot per session / TTL)
///        ▼
///   ┌──────────┐
///   │ scoring   │  P, E, R, M, A, V per respondent
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  predicate set → Selected row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  summary table, radar series, distributions
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod scoring;
pub mod stats;
