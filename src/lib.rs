pub mod charset;
pub mod error;
pub mod generator;
pub mod kdf;

pub use charset::{CharClass, CharsetSelection};
pub use error::GeneratorError;
pub use generator::{generate, render_password};
pub use kdf::{compose_salt, derive_entropy, GeneratorConfig, HashAlgorithm};
