pub mod file_key_value_store;
#[cfg(test)]
pub mod memory_store;
