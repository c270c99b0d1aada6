// store

mod kv_store;

pub use kv_store::*;

// repo

mod sponsor_repo;

pub use sponsor_repo::*;
