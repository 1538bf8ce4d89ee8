pub mod secp256k1_recovery;
