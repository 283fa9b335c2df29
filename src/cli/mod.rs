pub mod document;
pub mod inspect;
