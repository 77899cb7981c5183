//! Path algebra for flattening several build output trees into one package directory.
//!
//! `relative` holds the purely lexical helpers (normalisation, relative paths, ancestry) and
//! `mapper` applies them to the binaries/generated root rules used by the packager.

mod mapper;
mod relative;

pub use mapper::{PathMapper, RootMapping};
pub use relative::{absolutize, is_ancestor, normalize, relative_path};
