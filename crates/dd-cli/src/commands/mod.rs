//! CLI command implementations

pub(crate) mod common;
pub(crate) mod generate;
pub(crate) mod ls;
pub(crate) mod plan;
