pub mod cli;
pub mod commands;
pub mod error;
pub mod input;
pub mod logging;
