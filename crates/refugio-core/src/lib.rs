pub mod config;
pub mod logging;

pub mod checksum;
pub mod generate;
pub mod retry;
pub mod verse;
