pub mod intent;
pub mod measure;
pub mod operation;
pub mod record;
pub mod window;
