pub mod audit;
pub mod cipher;
pub mod key_stores;
pub mod recovery;
pub mod wallet;
