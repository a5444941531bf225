//! # lighttable
//!
//! Pixel and metadata helpers for photo gallery backends: a quality-tiered
//! thumbnail resampler and small, deterministic parsers for the auxiliary
//! data a gallery handles alongside its images.
//!
//! # Components
//!
//! The four core helpers are stateless and independent of each other:
//!
//! ```text
//! imaging::resample   raster + quality     →  downsampled raster
//! gps                 EXIF DMS rationals   →  signed decimal degrees
//! extension           path or URI          →  ".ext" token
//! credentials         plaintext            →  $2a$10$ bcrypt record
//! ```
//!
//! On top of them sit thumbnail/medium operations on image files, a
//! parallel batch run over a directory, and the `lighttable` CLI.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Adaptive resampler, crop/fit geometry, `image`-crate backend, thumbnail and medium operations |
//! | [`gps`] | EXIF GPS rational triples + hemisphere reference → decimal degrees |
//! | [`extension`] | Extension token from a path or URI, tolerant of `:size` suffixes |
//! | [`credentials`] | bcrypt hashing with an injectable salt source, and verification |
//! | [`process`] | Batch thumbnails and mediums for a directory, JSON manifest |
//! | [`config`] | `lighttable.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Quality Regimes
//!
//! The resampler trades accuracy for speed with a single `quality` knob. At 5
//! and above every source pixel contributes to the output. Below that, a
//! large reduction first picks nearest pixels into an intermediate about
//! `quality` times the output size, then area-averages it down. The
//! intermediate is an owned buffer released on every exit path.
//!
//! ## Lenient Metadata
//!
//! Metadata from uploads is often broken. The GPS and extension helpers
//! never fail: unparsable rationals read as zero, unknown hemisphere
//! references stay positive, and unparsable URIs have no extension. Only
//! the resampler and the credential hasher report errors, because their
//! failures are caller bugs or an unusable system.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and encoding go through the `image` crate with only pure-Rust
//! codecs enabled, so the binary has no system library dependencies.

pub mod config;
pub mod credentials;
pub mod extension;
pub mod gps;
pub mod imaging;
pub mod output;
pub mod process;
