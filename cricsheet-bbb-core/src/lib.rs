#![doc = "cricsheet-bbb-core: core logic library for cricsheet-bbb."]

//! This crate contains the ball-by-ball extraction pipeline: the typed match
//! document schema, the series filter, the delivery flattener, archive
//! scanning and CSV assembly. Command-line glue lives in the `cricsheet-bbb`
//! crate.
//!
//! # Usage
//! Build a [`config::PipelineConfig`], pick an [`contract::ArchiveFetcher`]
//! and call [`pipeline::run`].

pub mod archive;
pub mod assemble;
pub mod config;
pub mod contract;
pub mod document;
pub mod download;
pub mod filter;
pub mod flatten;
pub mod pipeline;
