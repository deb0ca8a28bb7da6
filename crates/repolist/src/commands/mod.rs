pub mod export;
pub mod list;
pub mod ports;
pub mod show;
pub mod validate;
