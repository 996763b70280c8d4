pub mod catalog;
pub mod placement;
