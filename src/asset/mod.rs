//! Asset references: resolution, snapshots, scanning and versioning.

mod resolve;
mod scan;
mod snapshot;
mod version;

// Resolution (pure functions)
pub use resolve::{AssetResolver, reference_literal};

// Scanning (pure functions)
pub use scan::{ExtractPattern, PatternError, extract};

// Snapshots (reads)
pub use snapshot::{
    AssetSnapshot, MissingAsset, SnapshotOutcome, SnapshotReader, canonical_path,
};

// Versioning
pub use version::{ReferencePattern, VersionDetails, restamp_literal};
