pub mod audit_helpers;
pub mod init;
pub mod keys;
pub mod log;
pub mod open;
pub mod seal;
pub mod wallet;
