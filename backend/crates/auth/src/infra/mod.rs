//! Infrastructure Layer
//!
//! Identity emulator, its token codec and account storage.

pub mod emulator;
pub mod jwt;
pub mod memory;

pub use emulator::{EmulatorIdentityProvider, PasswordResetCode, SignInResult};
pub use memory::InMemoryAccountRepository;
