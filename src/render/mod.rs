//! Frame passes and their orchestration.

pub(crate) mod coordinator;
pub(crate) mod overlay;
pub(crate) mod pipeline;
pub(crate) mod request;
pub(crate) mod resize;
pub(crate) mod shake;
pub(crate) mod trigger;
