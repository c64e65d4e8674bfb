//! Configuration management.
//!
//! Picker preferences ([`settings::Config`]) are stored as a TOML file and
//! loaded by the host at startup.

pub mod settings;
