//! CLI command implementations

pub(crate) mod common;
pub(crate) mod compile;
pub(crate) mod make;
pub(crate) mod migrate;
pub(crate) mod rollback;
pub(crate) mod status;
