#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod copy;
pub mod error;
pub mod launcher;
pub mod packager;
pub mod params;
pub mod paths;
pub mod transform;

pub use config::PackagerConfig;
pub use error::{PackagerError, PackagerResult};
pub use packager::{Packager, PackagerReport};
pub use params::ParameterSet;
pub use paths::{PathMapper, RootMapping};
pub use transform::{ReplacementPipeline, ReplacementRule};
