pub mod fetch;
pub mod inspect;
pub mod simulate;
