//! # helix-scribe
//!
//! Retrieval-augmented exemplar selection: keep a small corpus of reference
//! articles, rank them against a question by embedding similarity, and use the
//! closest ones as style exemplars for a one- or two-stage completion
//! pipeline.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use helix_scribe::adapters::{HashingEmbedder, OpenAiGenerator};
//! use helix_scribe::config::Config;
//! use helix_scribe::services::{DocumentStore, GenerationOrchestrator};
//! use helix_scribe::StyleMode;
//! use tokio::sync::RwLock;
//!
//! # async fn run() -> helix_scribe::Result<()> {
//! let config = Config::load()?;
//! let mut store = DocumentStore::new(Arc::new(HashingEmbedder::default()));
//! store
//!     .add("Remote work", "Remote work has altered cities. Offices sit empty.", "WSJ", None)
//!     .await?;
//!
//! let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);
//! let orchestrator = GenerationOrchestrator::new(Arc::new(RwLock::new(store)), generator);
//!
//! let answer = orchestrator
//!     .generate_single("What changed about offices?", StyleMode::Baseline, 150)
//!     .await?;
//! println!("{}", answer.as_text());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use domain::{Document, DocumentId, Generation, RankedResult, StyleMode};
pub use error::{Result, ScribeError};
