pub mod local_wallet;
