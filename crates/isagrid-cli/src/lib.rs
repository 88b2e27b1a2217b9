//! Library components of the `isagrid` command line tool.

pub mod export;
pub mod logging;
