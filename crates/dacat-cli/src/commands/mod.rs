//! Command implementations.

pub mod classify;
pub mod config;
pub mod merge;
pub mod run;
pub mod status;

pub use self::classify::execute_classify;
pub use self::config::execute_config;
pub use self::merge::execute_merge;
pub use self::run::execute_run;
pub use self::status::execute_status;
