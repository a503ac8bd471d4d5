pub mod create_signature;
