//! Font and decal resources, loaded once before rendering.

pub(crate) mod decal;
pub(crate) mod font;
