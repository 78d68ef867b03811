pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod logging;

pub use application::TrackerService;
pub use config::Config;
pub use domain::*;
