pub mod catalog;
pub mod persistence;
pub mod preload;
pub mod store;
