pub mod manager;
pub mod store;

pub use store::WordStore;
