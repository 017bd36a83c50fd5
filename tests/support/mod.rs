#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// An isolated data directory plus a command builder pointed at it.
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn init() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_file(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.file(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("toolbelt.toml", contents)
    }

    pub fn read_file(&self, name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.file(name))
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = toolbelt_cmd();
        cmd.env("TOOLBELT_DATA_DIR", self.dir.path());
        cmd
    }

    /// Run with `--json`, assert success, and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json envelope");
        assert_eq!(value["status"], "success");
        value["data"].clone()
    }
}

pub fn toolbelt_cmd() -> Command {
    let mut cmd = Command::cargo_bin("toolbelt").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("TOOLBELT_DATA_DIR");
    cmd
}
