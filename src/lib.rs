//! Post xUnit and Checkstyle report summaries as Bitbucket comments.

pub mod bitbucket;
pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod logs;
pub mod render;
pub mod report;
pub mod ui;
