pub mod access;
pub mod config;
pub mod display;
pub mod err;
pub mod export;
pub mod io;
pub mod table;
pub mod workflow;
