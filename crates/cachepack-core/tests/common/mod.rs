//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tar::Header;

/// Builds `<root>/pkg` with nested files, an empty directory and (on Unix)
/// a relative symlink.
pub fn sample_tree(root: &Path) -> PathBuf {
    let pkg = root.join("pkg");
    fs::create_dir_all(pkg.join("bin")).unwrap();
    fs::create_dir_all(pkg.join("share/empty")).unwrap();
    fs::write(pkg.join("README"), b"read me").unwrap();
    fs::write(pkg.join("bin/tool"), b"#!/bin/sh\necho tool\n").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(pkg.join("bin/tool"), fs::Permissions::from_mode(0o755)).unwrap();
        std::os::unix::fs::symlink("bin/tool", pkg.join("tool-link")).unwrap();
    }

    pkg
}

/// A tar header with raw name bytes, bypassing the builder's path checks.
pub fn raw_header(name: &str, kind: tar::EntryType, size: u64) -> Header {
    let mut header = Header::new_gnu();
    let bytes = name.as_bytes();
    header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
    header.set_entry_type(kind);
    header.set_size(size);
    header.set_mode(0o644);
    header.set_mtime(1_700_000_000);
    header.set_cksum();
    header
}

/// Uncompressed tar holding a single regular file under a raw name.
pub fn tar_with_raw_name(name: &str, data: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let header = raw_header(name, tar::EntryType::Regular, data.len() as u64);
    builder.append(&header, data).unwrap();
    builder.into_inner().unwrap()
}

/// Uncompressed tar with an unknown type flag followed by a regular file.
pub fn tar_with_unknown_entry() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let odd = raw_header("odd", tar::EntryType::new(b'Z'), 0);
    builder.append(&odd, std::io::empty()).unwrap();
    let file = raw_header("after.txt", tar::EntryType::Regular, 2);
    builder.append(&file, &b"ok"[..]).unwrap();
    builder.into_inner().unwrap()
}

/// Writes `tar` compressed to match the extension of `path`.
pub fn write_compressed_tar(path: &Path, tar: &[u8]) {
    let name = path.to_string_lossy();
    let bytes = if name.ends_with(".tar.zst") {
        zstd::encode_all(tar, 3).unwrap()
    } else {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(tar).unwrap();
        encoder.finish().unwrap()
    };
    fs::write(path, bytes).unwrap();
}

/// Zip with a single stored entry under `name`.
pub fn zip_with_entry(path: &Path, name: &str, data: &[u8]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file(name, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(data).unwrap();
    writer.finish().unwrap();
}
