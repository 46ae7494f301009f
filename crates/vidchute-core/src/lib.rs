pub mod artifact;
pub mod config;
pub mod fetch;
pub mod janitor;
pub mod logging;
pub mod urlfilter;
