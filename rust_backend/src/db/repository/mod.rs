//! Repository traits for the data the analytics layer consumes.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`readings`]: Raw readings per site
//! - [`aggregates`]: Bucketed history per site and interval
//!
//! Services that need both use the [`WeatherRepository`] bound:
//!
//! ```ignore
//! async fn overview<R: WeatherRepository>(repo: &R, site_id: i64) -> RepositoryResult<()> {
//!     let readings = repo.fetch_readings(site_id).await?;
//!     let hourly = repo.fetch_aggregates(site_id, IntervalType::Hour).await?;
//!     Ok(())
//! }
//! ```

pub mod aggregates;
pub mod error;
pub mod readings;

pub use aggregates::AggregateRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use readings::ReadingRepository;

/// Composite bound for a store that serves both readings and aggregates.
pub trait WeatherRepository: ReadingRepository + AggregateRepository {}

impl<T> WeatherRepository for T where T: ReadingRepository + AggregateRepository {}
