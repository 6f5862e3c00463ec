pub mod bootstrap;
pub mod gameplay;
mod loop_runner;

pub use loop_runner::run;
