//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitepush.toml`:
//!
//! | Module     | TOML Section   | Purpose                           |
//! |------------|----------------|-----------------------------------|
//! | `deploy`   | `[deploy]`     | Branch, folder, remote, message   |

mod deploy;

pub use deploy::{CommitErrorPolicy, DeployConfig};
