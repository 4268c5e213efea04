//! Session management, configuration and the engine contract

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod config;
pub mod engine;
pub mod session;

#[cfg(feature = "chrome")]
pub use chrome::{ChromeLauncher, ChromeOptions};
pub use config::{LaunchParams, SessionOptions};
pub use engine::{Engine, Launcher, MouseEvent, Page};
pub use session::Session;
