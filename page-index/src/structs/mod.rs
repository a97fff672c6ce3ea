pub mod index_config;
pub mod index_store;
