//! a throwaway directory tree standing in for sysfs in tests.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub struct FakeSysfs {
    root: PathBuf,
}

impl FakeSysfs {
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "pstatectl-test-{}-{id}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).expect("temp dir should be creatable");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir should be creatable");
        }
        fs::write(path, contents).expect("fixture file should be writable");
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path(relative)).expect("fixture file should exist");
    }

    pub fn write_core_frequency(&self, core: u32, khz: u64) {
        self.write(
            &format!("cpu{core}/cpufreq/scaling_cur_freq"),
            &format!("{khz}\n"),
        );
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
