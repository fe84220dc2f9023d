pub mod initialize;
pub mod keys;
pub mod store;

pub use store::Store;
