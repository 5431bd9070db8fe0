//! Bake deforming mesh animation into OpenEXR vertex animation textures.
//!
//! This crate drives [`vat_encode`] against a host scene and writes the result
//! to disk. The host side is represented by a JSON scene dump (see
//! [`scene`]), which stands in for the application that evaluates skinning,
//! shape keys and modifiers.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vat::{CancelToken, ExportSettings, SceneDump, export};
//!
//! # fn main() -> vat::Result<()> {
//! let scene = SceneDump::from_path("walk_cycle.json")?;
//! let summary = export(
//!     &scene,
//!     Path::new("walk_cycle"),
//!     &ExportSettings::default(),
//!     &CancelToken::new(),
//! )?;
//! println!("wrote {}", summary.path.display());
//! # Ok(())
//! # }
//! ```

mod error;

pub mod emit;
pub mod export;
pub mod scene;

pub use error::{Error, Precondition, Result};
pub use export::{ExportSettings, ExportSummary, export};
pub use scene::{DumpEvaluator, SceneDump, VERTEX_INDEX_LAYER};
pub use vat_encode::{BakeError, BakeOptions, CancelToken, NormalSpace, SampleError, VatBuffer};
