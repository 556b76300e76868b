pub mod bridge;
pub mod listen;
pub mod log;
pub mod seed;
pub mod sessions;
pub mod translator;
pub mod turn;
