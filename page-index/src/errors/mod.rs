pub mod index_error;
