//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod transform;

pub(crate) use convert::ConvertArgs;
pub(crate) use transform::TransformArgs;
