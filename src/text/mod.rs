//! Caption layout and rasterization.

pub(crate) mod caption;
pub(crate) mod layout;
