pub mod mainmem;
pub mod store;
