// Fake tacho-motor class directory for tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A class directory under the system temp dir, removed on drop
pub struct FakeSysfs {
    root: PathBuf,
}

impl FakeSysfs {
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "ev3-motor-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add a motor directory with the driver's default attribute values
    pub fn add_motor(&self, name: &str, port_name: &str) -> PathBuf {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (attr, value) in [
            ("port_name", port_name),
            ("run", "0"),
            ("duty_cycle_sp", "0"),
            ("power", "0"),
            ("regulation_mode", "off"),
            ("stop_mode", "coast"),
        ] {
            fs::write(dir.join(attr), format!("{}\n", value)).unwrap();
        }
        dir
    }

    pub fn read(&self, motor: &str, attr: &str) -> String {
        fs::read_to_string(self.root.join(motor).join(attr))
            .unwrap()
            .trim()
            .to_string()
    }

    pub fn write(&self, motor: &str, attr: &str, value: &str) {
        fs::write(self.root.join(motor).join(attr), format!("{}\n", value)).unwrap();
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
