mod dashstore;

pub use dashstore::DashStore;
