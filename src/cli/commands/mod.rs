pub mod ask;
pub mod config;
pub mod db;
pub mod init;
pub mod listen;
pub mod log;
pub mod query;
pub mod seed;
