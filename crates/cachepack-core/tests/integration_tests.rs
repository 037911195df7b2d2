//! End-to-end tests over real archives on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cachepack_core::ArchiveError;
use cachepack_core::ExtractionConfig;
use cachepack_core::MatchStrategy;
use cachepack_core::UnsupportedEntryPolicy;
use cachepack_core::creation::CreationConfig;
use std::fs;
use tempfile::TempDir;

const FORMATS: [&str; 5] = ["c.tar.gz", "c.tgz", "c.tar.zst", "c.tzst", "c.zip"];

#[test]
fn test_round_trip_every_format() {
    for name in FORMATS {
        let temp = TempDir::new().unwrap();
        let pkg = common::sample_tree(temp.path());
        let archive = temp.path().join(name);

        let created = cachepack_core::compress(&archive, &[&pkg], &CreationConfig::default())
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(created.files_added, 2, "{name}");
        assert!(created.bytes_compressed > 0, "{name}");

        let dest = temp.path().join("restore");
        let report =
            cachepack_core::extract(&archive, &dest, &ExtractionConfig::default()).unwrap();

        assert_eq!(report.files_extracted, 2, "{name}");
        assert_eq!(fs::read(dest.join("pkg/README")).unwrap(), b"read me");
        assert!(dest.join("pkg/share/empty").is_dir(), "{name}");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dest.join("pkg/bin/tool")).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755, "{name}");
            assert_eq!(
                fs::read_link(dest.join("pkg/tool-link")).unwrap(),
                std::path::Path::new("bin/tool"),
                "{name}"
            );
            assert_eq!(report.symlinks_created, 1, "{name}");
        }
    }
}

#[test]
fn test_listing_is_stable_and_ordered() {
    for name in FORMATS {
        let temp = TempDir::new().unwrap();
        let pkg = common::sample_tree(temp.path());
        let archive = temp.path().join(name);
        cachepack_core::compress(&archive, &[&pkg], &CreationConfig::default()).unwrap();

        let config = ExtractionConfig::default();
        let first = cachepack_core::list(&archive, &config).unwrap();
        let second = cachepack_core::list(&archive, &config).unwrap();
        assert_eq!(first, second, "{name}");

        assert_eq!(first[0], "Dir: pkg/", "{name}");
        assert!(first.contains(&"File: pkg/bin/tool".to_string()), "{name}");
        assert!(first.contains(&"Dir: pkg/share/empty/".to_string()), "{name}");
        #[cfg(unix)]
        assert!(
            first.contains(&"Symlink: pkg/tool-link -> bin/tool".to_string()),
            "{name}"
        );
    }
}

#[test]
fn test_file_in_strategies() {
    for name in FORMATS {
        let temp = TempDir::new().unwrap();
        let pkg = common::sample_tree(temp.path());
        let archive = temp.path().join(name);
        cachepack_core::compress(&archive, &[&pkg], &CreationConfig::default()).unwrap();

        let suffix = MatchStrategy::Suffix;
        assert!(cachepack_core::file_in(&archive, "bin/tool", suffix).unwrap());
        assert!(cachepack_core::file_in(&archive, "share/empty/", suffix).unwrap());
        assert!(!cachepack_core::file_in(&archive, "ool", suffix).unwrap());
        assert!(!cachepack_core::file_in(&archive, "missing", suffix).unwrap());

        let relaxed = MatchStrategy::Relaxed;
        assert!(cachepack_core::file_in(&archive, "tool", relaxed).unwrap());
        assert!(cachepack_core::file_in(&archive, "elsewhere/bin/tool", relaxed).unwrap());
        assert!(!cachepack_core::file_in(&archive, "elsewhere/bin/tool", suffix).unwrap());
        assert!(cachepack_core::file_in(&archive, "pkg/share/", relaxed).unwrap());
        assert!(!cachepack_core::file_in(&archive, "pk", relaxed).unwrap());
    }
}

#[test]
fn test_multiple_sources_and_single_file() {
    let temp = TempDir::new().unwrap();
    let pkg = common::sample_tree(temp.path());
    let lone = temp.path().join("lone.txt");
    fs::write(&lone, b"solo").unwrap();
    let archive = temp.path().join("multi.tar.zst");

    cachepack_core::compress(&archive, &[&pkg, &lone], &CreationConfig::default()).unwrap();

    let entries = cachepack_core::list(&archive, &ExtractionConfig::default()).unwrap();
    assert_eq!(entries.last().map(String::as_str), Some("File: lone.txt"));
}

#[test]
fn test_extract_into_missing_destination_creates_it() {
    let temp = TempDir::new().unwrap();
    let pkg = common::sample_tree(temp.path());
    let archive = temp.path().join("c.zip");
    cachepack_core::compress(&archive, &[&pkg], &CreationConfig::default()).unwrap();

    let dest = temp.path().join("a/b/c");
    cachepack_core::extract(&archive, &dest, &ExtractionConfig::default()).unwrap();
    assert!(dest.join("pkg/README").is_file());
}

#[test]
fn test_tar_traversal_is_rejected() {
    for name in ["evil.tar.gz", "evil.tar.zst"] {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join(name);
        common::write_compressed_tar(&archive, &common::tar_with_raw_name("../escape.txt", b"x"));

        let dest = temp.path().join("dest");
        let err = cachepack_core::extract(&archive, &dest, &ExtractionConfig::default())
            .unwrap_err();

        assert!(matches!(err, ArchiveError::PathTraversal { .. }), "{name}: {err}");
        assert!(err.is_security_violation());
        assert!(!temp.path().join("escape.txt").exists());
    }
}

#[test]
fn test_tar_absolute_name_is_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("abs.tar.gz");
    common::write_compressed_tar(&archive, &common::tar_with_raw_name("/tmp/abs.txt", b"x"));

    let err = cachepack_core::extract(&archive, temp.path().join("d"), &ExtractionConfig::default())
        .unwrap_err();
    assert!(matches!(err, ArchiveError::PathTraversal { .. }));
}

#[test]
fn test_zip_traversal_is_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    common::zip_with_entry(&archive, "../../evil.txt", b"pwned");

    let err = cachepack_core::extract(&archive, temp.path().join("d"), &ExtractionConfig::default())
        .unwrap_err();
    assert!(matches!(err, ArchiveError::PathTraversal { .. }));
    assert!(!temp.path().join("evil.txt").exists());
}

#[test]
fn test_unknown_tar_entries_follow_policy() {
    for name in ["odd.tar.gz", "odd.tar.zst"] {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join(name);
        common::write_compressed_tar(&archive, &common::tar_with_unknown_entry());

        let skip = ExtractionConfig::default();
        let report = cachepack_core::extract(&archive, temp.path().join("s"), &skip).unwrap();
        assert_eq!(report.entries_skipped, 1, "{name}");
        assert!(temp.path().join("s/after.txt").is_file(), "{name}");
        assert_eq!(
            cachepack_core::list(&archive, &skip).unwrap(),
            ["File: after.txt"],
            "{name}"
        );

        let abort = ExtractionConfig::default().with_unsupported_entries(UnsupportedEntryPolicy::Abort);
        assert!(matches!(
            cachepack_core::extract(&archive, temp.path().join("a"), &abort),
            Err(ArchiveError::UnsupportedEntryType { .. })
        ));
        assert!(matches!(
            cachepack_core::list(&archive, &abort),
            Err(ArchiveError::UnsupportedEntryType { .. })
        ));
    }
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let pkg = common::sample_tree(temp.path());
    let archive = temp.path().join("c.rar");

    let err = cachepack_core::compress(&archive, &[&pkg], &CreationConfig::default()).unwrap_err();
    assert!(matches!(err, ArchiveError::UnsupportedFormat { .. }));
    assert!(!archive.exists());
}

#[test]
fn test_missing_source() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("c.tar.gz");

    let err = cachepack_core::compress(&archive, &[temp.path().join("nope")], &CreationConfig::default())
        .unwrap_err();
    assert!(matches!(err, ArchiveError::SourceNotFound { .. }));
}

#[test]
fn test_corrupt_archive_is_an_error() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("junk.zip");
    fs::write(&archive, b"definitely not a zip").unwrap();

    assert!(cachepack_core::list(&archive, &ExtractionConfig::default()).is_err());
    assert!(cachepack_core::file_in(&archive, "x", MatchStrategy::Suffix).is_err());
}

#[cfg(unix)]
#[test]
fn test_hard_links_round_trip_through_tar() {
    use std::os::unix::fs::MetadataExt;

    let temp = TempDir::new().unwrap();
    let src = temp.path().join("links");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a"), b"shared").unwrap();
    fs::hard_link(src.join("a"), src.join("b")).unwrap();

    for name in ["h.tar.gz", "h.tar.zst"] {
        let archive = temp.path().join(name);
        let created = cachepack_core::compress(&archive, &[&src], &CreationConfig::default()).unwrap();
        assert_eq!(created.hardlinks_added, 1, "{name}");

        let listing = cachepack_core::list(&archive, &ExtractionConfig::default()).unwrap();
        assert!(listing.contains(&"Hardlink: links/b => links/a".to_string()), "{name}");

        let dest = temp.path().join(format!("out-{name}"));
        let report = cachepack_core::extract(&archive, &dest, &ExtractionConfig::default()).unwrap();
        assert_eq!(report.hardlinks_created, 1, "{name}");

        let a = fs::metadata(dest.join("links/a")).unwrap();
        let b = fs::metadata(dest.join("links/b")).unwrap();
        assert_eq!(a.ino(), b.ino(), "{name}");
    }
}

#[cfg(unix)]
#[test]
fn test_hard_links_disabled_store_content() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("links");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a"), b"shared").unwrap();
    fs::hard_link(src.join("a"), src.join("b")).unwrap();

    let archive = temp.path().join("h.tar.gz");
    let config = CreationConfig::default().with_detect_hard_links(false);
    let created = cachepack_core::compress(&archive, &[&src], &config).unwrap();
    assert_eq!(created.hardlinks_added, 0);
    assert_eq!(created.files_added, 2);
}

#[cfg(unix)]
#[test]
fn test_fifo_source_fails_before_output_exists() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir(&src).unwrap();
    let fifo = src.join("pipe");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).unwrap();
    #[allow(unsafe_code)]
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) };
    assert_eq!(rc, 0);

    for name in ["f.tar.gz", "f.zip"] {
        let archive = temp.path().join(name);
        let err = cachepack_core::compress(&archive, &[&src], &CreationConfig::default())
            .unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedEntryType { .. }), "{name}");
        assert!(!archive.exists(), "{name}");
    }
}

#[cfg(unix)]
#[test]
fn test_preexisting_symlink_in_destination_is_not_followed() {
    let temp = TempDir::new().unwrap();
    let outside = temp.path().join("outside");
    fs::create_dir(&outside).unwrap();

    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();
    std::os::unix::fs::symlink(&outside, dest.join("pkg")).unwrap();

    let archive = temp.path().join("c.tar.gz");
    common::write_compressed_tar(&archive, &common::tar_with_raw_name("pkg/owned", b"x"));

    let err = cachepack_core::extract(&archive, &dest, &ExtractionConfig::default()).unwrap_err();
    assert!(matches!(err, ArchiveError::PathTraversal { .. }));
    assert!(!outside.join("owned").exists());
}

#[test]
fn test_timestamps_restored_unless_disabled() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("t.tar.gz");
    common::write_compressed_tar(&archive, &common::tar_with_raw_name("stamp", b"t"));

    let dest = temp.path().join("on");
    cachepack_core::extract(&archive, &dest, &ExtractionConfig::default()).unwrap();
    let mtime = fs::metadata(dest.join("stamp")).unwrap().modified().unwrap();
    assert_eq!(
        mtime,
        std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000)
    );

    let dest = temp.path().join("off");
    let config = ExtractionConfig::default().with_restore_timestamps(false);
    cachepack_core::extract(&archive, &dest, &config).unwrap();
    let mtime = fs::metadata(dest.join("stamp")).unwrap().modified().unwrap();
    assert!(mtime > std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000));
}
