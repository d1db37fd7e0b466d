//! Fragment sources for Tuneforge.
//!
//! This crate provides concrete implementations of the `LogSource` trait.
//!
//! # Supported Sources
//!
//! - **Scripted**: an in-memory transcript replayed word by word (simulation, tests)
//! - **File**: a log file read in fixed-size chunks
//! - **Stdin**: standard input read in fixed-size chunks

pub mod demo;
pub mod reader;
pub mod scripted;

pub use demo::{DEPLOYMENT_LOG, FINE_TUNING_LOG, Scenario};
pub use reader::{DEFAULT_CHUNK_SIZE, FileSource, StdinSource, reader_stream};
pub use scripted::{Chunking, DEFAULT_WORD_DELAY, ScriptedSource};
