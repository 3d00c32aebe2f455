//! Common test utilities for roam integration tests.
//!
//! Provides `TestEnv` for isolated runs that never read the user's
//! `~/.roam.toml` or the caller's `NOMAD_*` / `ROAM_*` variables.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A 36-character token that passes validation.
pub const VALID_TOKEN: &str = "11111111-2222-3333-4444-555555555555";

/// A test environment with its own home directory.
///
/// The `roam()` method returns a `Command` with a cleared environment and
/// `HOME` pointed at the temp dir, so tests stay parallel-safe.
pub struct TestEnv {
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the roam binary with an isolated environment.
    pub fn roam(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_roam"));
        cmd.env_clear();
        cmd.env("HOME", self.home_dir.path());
        cmd.current_dir(self.home_dir.path());
        cmd
    }

    /// Same as `roam()` but as a std command, for long-running processes.
    pub fn roam_process(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_roam"));
        cmd.env_clear();
        cmd.env("HOME", self.home_dir.path());
        cmd.current_dir(self.home_dir.path());
        cmd
    }

    pub fn home(&self) -> &Path {
        self.home_dir.path()
    }

    /// Write `~/.roam.toml`.
    pub fn write_default_config(&self, content: &str) -> PathBuf {
        self.write_file(".roam.toml", content)
    }

    /// Write a file under the home directory.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Reserve a free local port by binding and releasing it.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
