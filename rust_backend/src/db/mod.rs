//! Data access for the analytics layer.
//!
//! Reading and aggregate stores sit behind the traits in [`repository`], so
//! services can be exercised against the in-memory
//! [`repositories::LocalRepository`] and pointed at a real backend later.
//!
//! ```text
//! WeatherAnalyticsService ──> WeatherRepository (traits)
//!                                   │
//!                             LocalRepository (in-memory)
//! ```

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{
    AggregateRepository, ReadingRepository, RepositoryError, RepositoryResult, WeatherRepository,
};
