#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # geobatch-entities
//!
//! Reusable, agnostic domain entities for batch geocoding.
//!
//! The entities only contain generic functionality that does not reveal
//! any application-specific business logic.

pub mod address;
pub mod geo;
pub mod outcome;
