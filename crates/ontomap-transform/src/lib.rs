//! Table reshaping for the annotation pipeline.
//!
//! Clinical source tables pack multiple values into single cells and spread
//! evidence across columns; the matchers want one value per row. This crate
//! provides the three reshape operations the pipeline is built from:
//! delimiter splitting, wide-to-long stacking, and long-to-wide collapsing.

mod error;
mod reshape;

pub use error::{Result, TransformError};
pub use reshape::{split_multivalued, to_long_format, to_wide_format};
