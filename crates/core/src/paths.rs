use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Paths {
    pub base: PathBuf,
}

impl Paths {
    pub fn new() -> Self {
        let base = dirs::home_dir()
            .map(|h| h.join(".websurfer"))
            .unwrap_or_else(|| PathBuf::from(".websurfer"));
        Self { base }
    }

    pub fn with_base(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.json")
    }

    /// Scratch location for downloaded artifacts. Session-scoped: files are
    /// written here for immediate conversion and never garbage-collected
    /// beyond process exit.
    pub fn downloads_dir(&self) -> PathBuf {
        self.base.join("downloads")
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.base.join("runs")
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::create_dir_all(self.downloads_dir())?;
        std::fs::create_dir_all(self.runs_dir())?;
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
