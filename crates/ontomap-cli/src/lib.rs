//! CLI library components for the ontology annotation pipeline.

pub mod logging;
