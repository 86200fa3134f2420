//! Random-access byte stores the engine corrupts in place.
//!
//! A store has a fixed length sampled up front. Positions are zero-indexed and every
//! access outside `[0, len)` is an error rather than a resize.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Shared behavior for anything the corruption engine can mutate.
pub trait ByteStore {
    /// Number of addressable bytes.
    fn len(&self) -> u64;

    /// Reads the byte at `pos`.
    ///
    /// # Errors
    ///
    /// Fails if `pos` is out of range or the underlying medium fails.
    fn read(&mut self, pos: u64) -> io::Result<u8>;

    /// Overwrites the byte at `pos`.
    ///
    /// # Errors
    ///
    /// Fails if `pos` is out of range or the underlying medium fails.
    fn write(&mut self, pos: u64, value: u8) -> io::Result<()>;
}

fn out_of_range(pos: u64, len: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("position {} is outside of store of length {}", pos, len),
    )
}

impl ByteStore for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read(&mut self, pos: u64) -> io::Result<u8> {
        let len = <[u8]>::len(self) as u64;
        usize::try_from(pos)
            .ok()
            .and_then(|i| self.get(i).copied())
            .ok_or_else(|| out_of_range(pos, len))
    }

    fn write(&mut self, pos: u64, value: u8) -> io::Result<()> {
        let len = <[u8]>::len(self) as u64;
        let slot = usize::try_from(pos)
            .ok()
            .and_then(|i| self.get_mut(i))
            .ok_or_else(|| out_of_range(pos, len))?;
        *slot = value;
        Ok(())
    }
}

impl ByteStore for Vec<u8> {
    fn len(&self) -> u64 {
        Vec::len(self) as u64
    }

    fn read(&mut self, pos: u64) -> io::Result<u8> {
        ByteStore::read(self.as_mut_slice(), pos)
    }

    fn write(&mut self, pos: u64, value: u8) -> io::Result<()> {
        ByteStore::write(self.as_mut_slice(), pos, value)
    }
}

/// A file on disk, opened read-write and mutated one byte at a time.
#[derive(Debug)]
pub struct FileStore {
    file: File,
    path: PathBuf,
    len: u64,
}

impl FileStore {
    /// Opens `path` for reading and writing without truncating it.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();
        tracing::debug!(event = "store_open", path = %path.display(), len, "opened file store");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pushes all written bytes down to the file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        if pos >= self.len {
            return Err(out_of_range(pos, self.len));
        }
        self.file.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

impl ByteStore for FileStore {
    fn len(&self) -> u64 {
        self.len
    }

    fn read(&mut self, pos: u64) -> io::Result<u8> {
        self.seek_to(pos)?;
        let mut byte = [0u8; 1];
        self.file.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn write(&mut self, pos: u64, value: u8) -> io::Result<()> {
        self.seek_to(pos)?;
        self.file.write_all(&[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn vec_store_reads_and_writes_in_range() {
        let mut store = vec![1u8, 2, 3];
        assert_eq!(ByteStore::len(&store), 3);
        assert_eq!(store.read(1).unwrap(), 2);
        ByteStore::write(&mut store, 2, 0xaa).unwrap();
        assert_eq!(store, vec![1, 2, 0xaa]);
    }

    #[test]
    fn vec_store_rejects_out_of_range() {
        let mut store = vec![0u8; 4];
        assert_eq!(store.read(4).unwrap_err().kind(), io::ErrorKind::InvalidInput);
        assert_eq!(
            ByteStore::write(&mut store, 100, 1).unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
        assert_eq!(ByteStore::len(&store), 4, "store must never resize");
    }

    #[test]
    fn file_store_mutates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rom.nes");
        fs::write(&path, [0x10, 0x20, 0x30, 0x40]).unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(ByteStore::len(&store), 4);
        assert_eq!(store.read(3).unwrap(), 0x40);
        ByteStore::write(&mut store, 0, 0xff).unwrap();
        assert!(store.read(4).is_err());
        store.flush().unwrap();
        drop(store);

        assert_eq!(fs::read(&path).unwrap(), vec![0xff, 0x20, 0x30, 0x40]);
    }

    #[test]
    fn file_store_open_fails_for_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStore::open(dir.path().join("missing.bin")).is_err());
    }
}
