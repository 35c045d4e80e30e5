//! sqlsynth Core - Query synthesis and complexity labeling.
//!
//! This crate generates randomized but plausible SQL over a table catalog,
//! extracts structural metadata for each query, and labels every query with
//! a low/medium/high execution cost class.
//!
//! All randomness flows through one caller-owned generator, so a run is
//! reproducible from its seed.

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod predicate;
pub mod sampler;
pub mod scorer;
pub mod select;
pub mod shape;

pub use assembler::{join_condition, GeneratedQuery, QueryGenerator};
pub use catalog::{TableCatalog, TableDef};
pub use config::{GeneratorConfig, ShapeSkew};
pub use dataset::{generate_dataset, DatasetSummary, LabeledRow};
pub use error::Error;
pub use extract::{CatalogExtractor, MetadataExtractor};
pub use predicate::{build_pred, ColumnKind};
pub use sampler::{pick_table, Bias};
pub use scorer::{score, score_and_label, Label};
pub use select::{make_select_list, AliasedColumn};
pub use shape::QueryShape;

/// Re-export the SQL surface crate.
pub use sqlsynth_lang as lang;
pub use sqlsynth_lang::Metadata;
