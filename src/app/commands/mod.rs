pub mod apply;
pub mod fields;
pub mod finalize;
pub mod inspect;
