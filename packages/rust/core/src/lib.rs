//! Core pipeline and domain logic for basin-recipes.
//!
//! Ties together database import, instruction markup, image discovery, and
//! manifest assembly into a single batch build (`pipeline::run`).

pub mod assembler;
pub mod categories;
pub mod images;
pub mod importer;
pub mod pipeline;
pub mod sink;
pub mod toc;
