pub mod local_store;
