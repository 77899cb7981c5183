//! Content transformations applied while copying files into the package.

mod rules;
mod stamp;

pub use rules::{ReplacementPipeline, ReplacementRule, Substitution, parse_replacements};
pub use stamp::{find_stamp_value, read_stamp_value};
