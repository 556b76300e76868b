pub mod colors;
pub mod date;
