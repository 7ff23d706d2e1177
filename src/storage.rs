//! On-disk file store backing the transfer protocol.
//!
//! Files live flat under a single root directory. Uploads arrive as
//! chunks addressed by byte offset; a chunk write opens the target file,
//! seeks, and writes in place, so in-order chunks at cumulative offsets
//! reassemble the original content. Writing past the current end extends
//! the file (the gap reads back as zeroes).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!(root = %root.display(), "Storage root ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` into `name` at the given byte offset.
    pub fn write_at(&self, name: &str, offset: u64, data: &[u8]) -> io::Result<usize> {
        let path = self.resolve(name)?;
        let mut file = OpenOptions::new().create(true).write(true).open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        debug!(file = name, offset, len = data.len(), "Chunk written");
        Ok(data.len())
    }

    /// Read the entire contents of `name`.
    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.resolve(name)?;
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        Ok(data)
    }

    /// List stored files, sorted by name. Only regular files count.
    pub fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Map a wire filename to a path under the root.
    ///
    /// Names are bare: anything that could address outside the root
    /// (separators, `..`, empty) is refused.
    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\')
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid filename: {name:?}"),
            ));
        }
        Ok(self.root.join(name))
    }
}
