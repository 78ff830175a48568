//! # Pager
//!
//! Demand-loading page cache over the database file.
//!
//! ## Contract
//!
//! - `open` validates that the file length is a whole number of pages and
//!   derives the page count from it.
//! - `get_page(n)` returns the cached buffer for page `n`, reading it from
//!   disk on first access. Requesting `n == num_pages` allocates a fresh
//!   zeroed page and grows the page count; the page reaches disk only at
//!   flush. Requesting past that is an error (the file has no holes).
//! - `flush` writes every cached page below the page count back to its
//!   offset and syncs the file.
//!
//! ## Cache Policy
//!
//! The cache is a fixed array of [`MAX_CACHED_PAGES`] slots indexed
//! directly by page number. There is no eviction and no dirty tracking;
//! the capacity is a hard ceiling on database size within one process, and
//! flush rewrites everything that was ever touched.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use eyre::{bail, ensure, Result, WrapErr};

use crate::config::{MAX_CACHED_PAGES, PAGE_SIZE};

#[derive(Debug)]
pub struct Pager {
    file: File,
    num_pages: u32,
    pages_on_disk: u32,
    pages: Vec<Option<Box<[u8; PAGE_SIZE]>>>,
}

impl Pager {
    /// Opens the database file, creating it if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .wrap_err_with(|| format!("failed to open database file {:?}", path))?;

        let file_len = file
            .metadata()
            .wrap_err("failed to read database file metadata")?
            .len();
        ensure!(
            file_len % PAGE_SIZE as u64 == 0,
            "corrupt database file: {} bytes is not a whole number of {}-byte pages",
            file_len,
            PAGE_SIZE
        );
        let num_pages = (file_len / PAGE_SIZE as u64) as u32;

        let mut pages = Vec::with_capacity(MAX_CACHED_PAGES);
        pages.resize_with(MAX_CACHED_PAGES, || None);

        Ok(Self {
            file,
            num_pages,
            pages_on_disk: num_pages,
            pages,
        })
    }

    /// Number of pages the database currently spans, including pages that
    /// exist only in the cache.
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Returns the in-memory buffer for `page_num`, loading or allocating
    /// it on first access.
    pub fn get_page(&mut self, page_num: u32) -> Result<&mut [u8; PAGE_SIZE]> {
        ensure!(
            (page_num as usize) < MAX_CACHED_PAGES,
            "page {} exceeds the {}-page cache capacity",
            page_num,
            MAX_CACHED_PAGES
        );
        ensure!(
            page_num <= self.num_pages,
            "page {} requested past the end of the database ({} pages)",
            page_num,
            self.num_pages
        );

        let slot = page_num as usize;
        if self.pages[slot].is_none() {
            let mut buf = Box::new([0u8; PAGE_SIZE]);
            if page_num < self.pages_on_disk {
                self.file
                    .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))
                    .wrap_err_with(|| format!("failed to seek to page {}", page_num))?;
                self.file
                    .read_exact(&mut buf[..])
                    .wrap_err_with(|| format!("failed to read page {}", page_num))?;
            }
            if page_num == self.num_pages {
                self.num_pages += 1;
            }
            self.pages[slot] = Some(buf);
        }

        let Some(page) = self.pages[slot].as_mut() else {
            bail!("page {} missing from cache after load", page_num);
        };
        Ok(page)
    }

    /// Writes every cached page back to the file and syncs it. The file
    /// handle stays open; dropping the pager closes it.
    pub fn flush(&mut self) -> Result<()> {
        for page_num in 0..self.num_pages {
            if let Some(page) = &self.pages[page_num as usize] {
                self.file
                    .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))
                    .wrap_err_with(|| format!("failed to seek to page {}", page_num))?;
                self.file
                    .write_all(&page[..])
                    .wrap_err_with(|| format!("failed to write page {}", page_num))?;
            }
        }
        self.pages_on_disk = self.pages_on_disk.max(self.num_pages);
        self.file
            .sync_all()
            .wrap_err("failed to sync database file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_missing_file_with_zero_pages() {
        let dir = tempdir().unwrap();
        let pager = Pager::open(dir.path().join("test.db")).unwrap();

        assert_eq!(pager.num_pages(), 0);
    }

    #[test]
    fn open_rejects_partial_page_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        std::fs::write(&path, vec![0u8; PAGE_SIZE + 1]).unwrap();

        let result = Pager::open(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("corrupt"));
    }

    #[test]
    fn fresh_page_is_zeroed_and_grows_page_count() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("test.db")).unwrap();

        let page = pager.get_page(0).unwrap();
        assert!(page.iter().all(|&b| b == 0));
        assert_eq!(pager.num_pages(), 1);
    }

    #[test]
    fn get_page_past_end_is_rejected() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("test.db")).unwrap();

        let result = pager.get_page(1);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("past the end"));
    }

    #[test]
    fn get_page_beyond_cache_capacity_is_rejected() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("test.db")).unwrap();

        let result = pager.get_page(MAX_CACHED_PAGES as u32);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cache capacity"));
    }

    #[test]
    fn flush_persists_pages_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut pager = Pager::open(&path).unwrap();
            let page = pager.get_page(0).unwrap();
            page[0] = 0xAB;
            page[PAGE_SIZE - 1] = 0xCD;
            pager.flush().unwrap();
        }

        let mut pager = Pager::open(&path).unwrap();
        assert_eq!(pager.num_pages(), 1);
        let page = pager.get_page(0).unwrap();
        assert_eq!(page[0], 0xAB);
        assert_eq!(page[PAGE_SIZE - 1], 0xCD);
    }

    #[test]
    fn cached_page_survives_repeated_access() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("test.db")).unwrap();

        pager.get_page(0).unwrap()[7] = 42;
        assert_eq!(pager.get_page(0).unwrap()[7], 42);
        assert_eq!(pager.num_pages(), 1);
    }

    #[test]
    fn file_length_is_page_aligned_after_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut pager = Pager::open(&path).unwrap();
        pager.get_page(0).unwrap();
        pager.get_page(1).unwrap();
        pager.flush().unwrap();

        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, 2 * PAGE_SIZE as u64);
    }
}
