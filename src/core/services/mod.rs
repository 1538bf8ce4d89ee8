pub mod dual_access_service;
pub mod key_cache;
pub mod public_key_service;
