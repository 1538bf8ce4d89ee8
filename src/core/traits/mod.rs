pub mod audit;
pub mod cipher;
pub mod key_value_store;
pub mod recovery;
