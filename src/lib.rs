pub mod artifact;
pub mod cleaning;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod run;
pub mod transform;
