//! Builds the sample, experiment and run XML documents of an ENA submission
//! from CSV sheets.
//!
//! The three documents are chained by alias: experiments reference sample
//! aliases read back from `samples.xml`, and runs reference experiment
//! aliases listed in a mapping sheet.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod experiment;
pub mod output;
pub mod run;
pub mod sample;
pub mod table;
pub mod xml;
