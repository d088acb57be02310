//! # Case Records
//!
//! The record-set crate - the canonical shape of a person's case information
//! together with the rules shared by every producer and consumer of it.
//! This crate does not know about graphs or dialogs.
//!
//! ## Core Components
//!
//! - **records**: The record-set (person plus nine repeatable collections)
//! - **dates**: Date normalization (including Japanese era dates) and age calculation
//! - **validation**: Required-field and enumerated-value checks returning error lists
//! - **vocabulary**: Controlled values (genders, statuses, flags, skip tokens)

pub mod dates;
pub mod error;
pub mod records;
pub mod validation;
pub mod vocabulary;

pub use dates::Era;
pub use error::RecordError;
pub use records::*;
pub use validation::*;
pub use vocabulary::*;
