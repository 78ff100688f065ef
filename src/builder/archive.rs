//! Archive Writer
//!
//! Packs generated documents and image payloads into an in-memory zip
//! container with the entry layout EPUB readers expect.

use std::io::{Cursor, Write};

use log::debug;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::EpubError;

pub const MIMETYPE: &str = "application/epub+zip";

/// In-memory EPUB container
///
/// `mimetype` is written uncompressed as the very first entry when the writer
/// is created, so no other entry can precede it. Every later entry is deflated.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveWriter {
    /// Creates the container and writes the `mimetype` entry
    ///
    /// ## Parameters
    /// - `compression_level`: Deflate level used for every later entry, 0 to 9
    pub fn new(compression_level: i64) -> Result<Self, EpubError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE.as_bytes())?;

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level));

        Ok(Self {
            zip,
            options,
            entries: 1,
        })
    }

    /// Adds one deflated entry
    pub fn add_file(&mut self, path: &str, data: &[u8]) -> Result<&mut Self, EpubError> {
        self.zip.start_file(path, self.options)?;
        self.zip.write_all(data)?;
        self.entries += 1;

        debug!("Archived {} ({} bytes)", path, data.len());
        Ok(self)
    }

    /// Number of entries written so far, `mimetype` included
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Finalizes the central directory and returns the container bytes
    pub fn finish(self) -> Result<Vec<u8>, EpubError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use zip::{CompressionMethod, ZipArchive};

    use crate::builder::archive::{ArchiveWriter, MIMETYPE};

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        archive.by_name(name).unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_mimetype_is_first_and_stored() {
        let mut writer = ArchiveWriter::new(9).unwrap();
        writer
            .add_file("META-INF/container.xml", b"<container/>")
            .unwrap()
            .add_file("OEBPS/images/image_0001.png", &[0x89, 0x50, 0x4E, 0x47])
            .unwrap();
        assert_eq!(writer.entry_count(), 3);

        let bytes = writer.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        assert_eq!(read_entry(&mut archive, "mimetype"), MIMETYPE.as_bytes());
    }

    #[test]
    fn test_later_entries_are_deflated() {
        let text = "<p>repeat</p>".repeat(200);

        let mut writer = ArchiveWriter::new(9).unwrap();
        writer.add_file("OEBPS/page_0001.xhtml", text.as_bytes()).unwrap();
        let bytes = writer.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let entry = archive.by_index(1).unwrap();
        assert_eq!(entry.name(), "OEBPS/page_0001.xhtml");
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());
        drop(entry);

        assert_eq!(read_entry(&mut archive, "OEBPS/page_0001.xhtml"), text.as_bytes());
    }

    #[test]
    fn test_entry_order_is_kept() {
        let mut writer = ArchiveWriter::new(6).unwrap();
        for name in ["b.txt", "a.txt", "c.txt"] {
            writer.add_file(name, name.as_bytes()).unwrap();
        }
        let bytes = writer.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names: Vec<String> = (0..archive.len())
            .map(|index| archive.by_index(index).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["mimetype", "b.txt", "a.txt", "c.txt"]);
    }
}
