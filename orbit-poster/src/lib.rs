pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod module;

#[cfg(test)]
pub(crate) mod testing;
