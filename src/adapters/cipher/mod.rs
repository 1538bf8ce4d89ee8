pub mod secp256k1_backend;
