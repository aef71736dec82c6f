use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::title::Title;

const PAGE_EXTENSION: &str = "txt";

#[derive(Debug)]
pub enum StoreError {
    NotFound(Title),
    Io(std::io::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(title) => write!(f, "Page not found: {}", title),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    /// A page that has not been written yet.
    pub fn empty(title: Title) -> Self {
        Self {
            title,
            body: Vec::new(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    /// The front page is never removed.
    Protected,
}

/// Flat directory of pages, one `<title>.txt` file per page.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Like `new`, but creates the data directory if it is missing.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root.as_ref())?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.root.join(format!("{}.{}", title.as_str(), PAGE_EXTENSION))
    }

    pub fn load(&self, title: &Title) -> Result<Page, StoreError> {
        match std::fs::read(self.page_path(title)) {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(title.clone())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Overwrites the whole page. New files are readable by the owner only.
    pub fn save(&self, page: &Page) -> Result<(), StoreError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(self.page_path(&page.title))?;
        file.write_all(&page.body)?;
        file.flush()?;

        log::debug!("Saved page {} ({} bytes)", page.title, page.body.len());
        Ok(())
    }

    pub fn delete(&self, title: &Title) -> Result<Deleted, StoreError> {
        if title.is_front_page() {
            log::info!("Refusing to delete protected page {}", title);
            return Ok(Deleted::Protected);
        }

        match std::fs::remove_file(self.page_path(title)) {
            Ok(()) => {
                log::info!("Deleted page {}", title);
                Ok(Deleted::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(title.clone())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Titles of every stored page, sorted. Files that are not pages
    /// (`settings.toml`, editor backups, directories) are skipped.
    pub fn list_titles(&self) -> Result<Vec<String>, StoreError> {
        let mut titles = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(title) = title_from_file_name(&entry.path()) {
                titles.push(title);
            }
        }

        titles.sort();
        Ok(titles)
    }
}

/// Strips exactly one trailing `.txt`, so `notes.v2.txt` maps to `notes.v2`.
fn title_from_file_name(path: &Path) -> Option<String> {
    let is_page = path
        .extension()
        .map(|ext| ext == PAGE_EXTENSION)
        .unwrap_or(false);
    if !is_page {
        return None;
    }

    let stem = path.file_stem()?.to_string_lossy().to_string();
    if stem.is_empty() { None } else { Some(stem) }
}
