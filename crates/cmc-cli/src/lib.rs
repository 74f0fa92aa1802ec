//! Library components of the `cmc-ic` command-line tool.

pub mod logging;
pub mod report;
