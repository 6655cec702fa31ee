//! Error types for the cage-generation pipeline.
//!
//! Branch-local rejections (steric clashes, quota exhaustion) are never represented here — they
//! are plain `bool`/`Option` returns from the placement routines and must not unwind across the
//! worklist loop in `synthesis`. Only failures that make the rest of the run meaningless (bad
//! input, a collaborator that could not produce an envelope, exhausted allocation) are errors.

use std::path::PathBuf;
use thiserror::Error;

/// Root error for every fallible operation exposed by this crate.
#[derive(Debug, Error)]
pub enum CageError {
    /// The input XYZ file or covalent-radius table could not be opened.
    #[error("could not open input file {path}: {source}")]
    InputMissing {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The XYZ file or radius table was malformed.
    #[error("failed to parse {path}: {message}")]
    ParseError {
        /// File that failed to parse.
        path: PathBuf,
        /// Human-readable description of the malformed content.
        message: String,
    },

    /// A sentinel-slot list or arena ran out of capacity and growth failed.
    #[error("allocation failure while growing {what}")]
    AllocFail {
        /// Name of the structure that could not grow (e.g. "envelope neighborhood").
        what: String,
    },

    /// The external alpha-shape collaborator reported a failure.
    #[error("alpha-shape computation failed: {message}")]
    ExternalTooling {
        /// Message reported by the collaborator.
        message: String,
    },

    /// An element symbol in the substrate has no entry in the covalent-radius table.
    #[error("element symbol '{symbol}' is not referenced in the covalent-radius table")]
    TypeUnknown {
        /// The unresolved element symbol.
        symbol: String,
    },

    /// A* exhausted its open set without reaching the goal.
    ///
    /// Pathfinding itself never constructs this variant as a `Result::Err` on the hot path —
    /// callers that need a distance treat an exhausted search as `f32::INFINITY` directly (§4.V,
    /// §7). This variant exists so the taxonomy is complete and so diagnostics/tests can name the
    /// condition explicitly.
    #[error("no path exists between the requested grid cells")]
    NoPath,

    /// Failed to (de)serialize a `RunConfig` from TOML.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
