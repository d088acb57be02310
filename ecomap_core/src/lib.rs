//! # Ecomap Core
//!
//! Turns a person's case records into an ecomap: a typed graph of the person,
//! their family, certificates, services, and medical care, with display
//! metadata for a renderer. Records come from `case_records`, either loaded
//! from JSON or collected turn by turn through the dialog engine.
//!
//! ## Core Components
//!
//! - **graph**: Node and relation types, their generators, and the two-pass builder
//! - **dialog**: A forward-only state machine that collects a record-set from answers
//! - **config**: Output metadata, relation styling, and validation mode from TOML
//!
//! ## Example
//!
//! ```no_run
//! use case_records::{PersonRecord, RecordSet};
//! use ecomap_core::{build_ecomap, EcomapConfig};
//!
//! let records = RecordSet::new(PersonRecord::new("山田太郎"));
//! let config = EcomapConfig::default().with_source("interactive_mode");
//! let graph = build_ecomap(&records, &config, case_records::dates::today())?;
//! println!("{}", graph.to_json_pretty()?);
//! # Ok::<(), ecomap_core::EcomapError>(())
//! ```

pub mod config;
pub mod dialog;
pub mod error;
pub mod graph;

pub use config::*;
pub use dialog::{DialogEngine, DialogState};
pub use error::{EcomapError, Result};
pub use graph::*;
