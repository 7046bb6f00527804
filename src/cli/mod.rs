pub mod app;
pub mod assist;
pub mod classify;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod evaluate;
pub mod generate;
pub mod output;
pub mod runtime;
pub mod snippet;
pub mod target;

pub use app::run;
pub use env::CliArgs;
