//! Perceptual comparison of rendered frames.
//!
//! Two images are projected onto a shared canonical canvas, diffed
//! per-pixel by a pixelmatch-style provider (dify), and the resulting
//! mask is grouped into 8-connected clusters. Thin, path-like clusters
//! are classified as rendering jitter ("line shifts") and ignored; the
//! verdict comes from the clusters that survive.

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod report;

pub use config::{CompareConfig, CompareOverrides};
pub use engine::{
    BatchEntry, Bounds, Cluster, CompareError, ComparisonResult, Engine, ImageInput, NamedPair,
};
