//! Cryptographic primitives for datasource passwords at rest.

pub mod encryption;

pub use encryption::{Aes256GcmCipher, Cipher};
