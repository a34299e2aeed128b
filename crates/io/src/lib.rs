//! # biascorr-io
//!
//! Read correction cells from JSON and write corrected series back out.
//! Bridges the file layout in [`model`] into the
//! [`CorrectionContext`](biascorr_mapping::CorrectionContext) inputs of
//! `biascorr-mapping`.

mod error;
pub mod model;
mod reader;
mod validate;
mod writer;

pub use error::IoError;
pub use model::{CellStatus, KindRecord, ResultFile, VariableMeta};
pub use reader::{Cell, CellFile, read_cells};
pub use writer::{WriterConfig, read_results, write_results};
