use super::*;
use std::cmp::Ordering;

#[test]
fn test_dir_entry_new() {
    let entry = DirEntry::new(PathBuf::from("/test/file.txt"), false);
    assert_eq!(entry.name, "file.txt");
    assert_eq!(entry.path, PathBuf::from("/test/file.txt"));
    assert!(!entry.is_dir);
}

#[test]
fn test_file_error_display() {
    let err = FileError::NotFound(PathBuf::from("/test"));
    assert!(err.to_string().contains("/test"));
}

#[test]
fn entry_order_puts_directories_first() {
    assert_eq!(entry_order(true, "zeta", false, "alpha"), Ordering::Less);
    assert_eq!(entry_order(false, "alpha", true, "zeta"), Ordering::Greater);
}

#[test]
fn entry_order_ignores_case_within_group() {
    let mut names = vec!["Z.txt", "a.txt", "B.txt"];
    names.sort_by(|a, b| entry_order(false, a, false, b));
    assert_eq!(names, vec!["a.txt", "B.txt", "Z.txt"]);
}

#[test]
fn entry_order_is_total_for_case_twins() {
    assert_ne!(entry_order(false, "A.txt", false, "a.txt"), Ordering::Equal);
}

struct TableProvider {
    dirs: Vec<(&'static str, Vec<DirEntry>)>,
}

impl FileProvider for TableProvider {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.dirs
            .iter()
            .find(|(p, _)| Path::new(p) == path)
            .map(|(_, entries)| entries.clone())
            .ok_or_else(|| FileError::NotFound(path.to_path_buf()))
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        Err(FileError::NotFound(path.to_path_buf()))
    }

    fn write_file(&self, _path: &Path, _content: &str) -> Result<()> {
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

#[test]
fn find_file_descends_into_directories_before_later_siblings() {
    let provider = TableProvider {
        dirs: vec![
            (
                "/p",
                vec![
                    DirEntry::new(PathBuf::from("/p/sub"), true),
                    DirEntry::new(PathBuf::from("/p/x.txt"), false),
                ],
            ),
            ("/p/sub", vec![DirEntry::new(PathBuf::from("/p/sub/x.txt"), false)]),
        ],
    };

    let found = provider.find_file(Path::new("/p"), "x.txt").unwrap();
    assert_eq!(found, Some(PathBuf::from("/p/sub/x.txt")));
}

#[test]
fn find_file_reports_missing_name() {
    let provider = TableProvider {
        dirs: vec![("/p", vec![DirEntry::new(PathBuf::from("/p/a.txt"), false)])],
    };
    assert_eq!(provider.find_file(Path::new("/p"), "b.txt").unwrap(), None);
}

#[test]
fn find_file_skips_unreadable_subdirectories() {
    let provider = crate::testing::MemoryFileProvider::new()
        .with_file("/p/a/locked/x.txt", "")
        .with_file("/p/b/x.txt", "");
    provider.break_path("/p/a/locked");

    let found = provider.find_file(Path::new("/p"), "x.txt").unwrap();
    assert_eq!(found, Some(PathBuf::from("/p/b/x.txt")));
}

#[test]
fn find_file_errors_when_root_cannot_be_listed() {
    let provider = crate::testing::MemoryFileProvider::new().with_dir("/p");
    provider.break_path("/p");

    assert!(matches!(
        provider.find_file(Path::new("/p"), "x.txt"),
        Err(FileError::Io(_))
    ));
    assert!(matches!(
        provider.find_file(Path::new("/missing"), "x.txt"),
        Err(FileError::NotADirectory(_))
    ));
}
