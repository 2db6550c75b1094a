//! # Sentiment Analytics Core
//!
//! This crate turns two raw sentiment indicators into a z-score scatter of
//! sentiment regimes. It is pure and synchronous: no I/O, no shared state.
//!
//! ## Pipeline
//!
//! - `SeriesAligner`: inner-joins strength and breadth on their UTC day.
//! - `WindowSelector`: keeps the trailing N observations (20 by default).
//! - `ZScoreNormalizer`: standardizes each field with the (n - 1) sample deviation.
//! - `QuadrantClassifier`: maps each point to Greed, Mixed, Fear or Recovery.
//! - `ReportAssembler`: packages the classified points and the as-of date.
//!
//! `AnalyticsEngine` chains all five. Every failure is an `AnalyticsError`;
//! undefined statistics never leak out as NaN or infinity.

// Declare the modules that constitute this crate.
pub mod aligner;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod report;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use aligner::{LabeledSeries, SeriesAligner};
pub use classifier::QuadrantClassifier;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use normalizer::{FieldStats, Normalization, ZScoreNormalizer};
pub use report::{Report, ReportAssembler, WindowStats};
pub use window::{DEFAULT_WINDOW_SIZE, WindowSelector};
