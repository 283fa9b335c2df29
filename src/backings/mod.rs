//! Stock backing types available to the command-line inspector.

pub mod address;
pub mod contact;

pub use address::Address;
pub use contact::Contact;
