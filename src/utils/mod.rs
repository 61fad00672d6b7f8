//! Utility modules for deploying a build folder.

pub mod exec;
pub mod git;
