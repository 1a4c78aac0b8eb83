pub mod catalog;
pub mod clients;
pub mod orders;
