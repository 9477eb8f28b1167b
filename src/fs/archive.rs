use std::fs::{self, File};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, IoResultExt, Result};

/// extracts the archive formats used during staging
pub trait Archiver {
    /// extract a zip archive into `dst`, creating it if needed
    fn unzip(&self, archive: &Path, dst: &Path) -> Result<()>;

    /// extract a gzip-compressed tarball into `dst`, creating it if needed
    fn untar_gz(&self, archive: &Path, dst: &Path) -> Result<()>;
}

/// in-process extraction with the zip, tar and flate2 crates
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeArchiver;

impl Archiver for NativeArchiver {
    fn unzip(&self, archive: &Path, dst: &Path) -> Result<()> {
        fs::create_dir_all(dst).with_path(dst)?;
        let file = File::open(archive).with_path(archive)?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;
        zip.extract(dst).map_err(|e| archive_error(archive, e))
    }

    fn untar_gz(&self, archive: &Path, dst: &Path) -> Result<()> {
        fs::create_dir_all(dst).with_path(dst)?;
        let file = File::open(archive).with_path(archive)?;
        let mut tar = tar::Archive::new(GzDecoder::new(file));
        tar.set_overwrite(true);
        tar.unpack(dst).map_err(|e| archive_error(archive, e))
    }
}

fn archive_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Archive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    /// write a zip archive with the given (name, contents) files
    pub(crate) fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, contents) in files {
            zip.start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    /// write a .tgz archive with the given (name, contents) files
    pub(crate) fn write_tgz(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_unzip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("app.zip");
        write_zip(&archive, &[("index.php", "<?php"), ("lib/util.php", "fn")]);

        let dst = dir.path().join("out/app");
        NativeArchiver.unzip(&archive, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("index.php")).unwrap(), "<?php");
        assert_eq!(fs::read_to_string(dst.join("lib/util.php")).unwrap(), "fn");
    }

    #[test]
    fn test_unzip_garbage_fails() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("bad.zip");
        fs::write(&archive, "definitely not a zip").unwrap();

        let result = NativeArchiver.unzip(&archive, &dir.path().join("out"));
        assert!(matches!(result, Err(Error::Archive { .. })));
    }

    #[test]
    fn test_untar_gz() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("cache.tgz");
        write_tgz(&archive, &[("gems/rack.gem", "rack"), ("node/.keep", "")]);

        let dst = dir.path().join("cache");
        NativeArchiver.untar_gz(&archive, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("gems/rack.gem")).unwrap(), "rack");
        assert!(dst.join("node/.keep").is_file());
    }

    #[test]
    fn test_untar_gz_overwrites() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("cache.tgz");
        write_tgz(&archive, &[("state", "fresh")]);

        let dst = dir.path().join("cache");
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("state"), "stale").unwrap();

        NativeArchiver.untar_gz(&archive, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst.join("state")).unwrap(), "fresh");
    }

    #[test]
    fn test_untar_gz_corrupt_fails() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("cache.tgz");
        fs::write(&archive, "not gzip at all").unwrap();

        let result = NativeArchiver.untar_gz(&archive, &dir.path().join("cache"));
        assert!(matches!(result, Err(Error::Archive { .. })));
    }
}
