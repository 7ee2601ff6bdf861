use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the entries of `dir` in name order, skipping dotfiles.
pub fn list_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Copies a file or a whole directory tree. Returns the number of files
/// copied.
pub fn copy_recursive(from: &Path, to: &Path) -> io::Result<usize> {
    if from.is_dir() {
        fs::create_dir_all(to)?;
        let mut copied = 0;
        // Copies keep every entry, dotfiles included
        for entry in fs::read_dir(from)? {
            let entry = entry?;
            copied += copy_recursive(&entry.path(), &to.join(entry.file_name()))?;
        }
        Ok(copied)
    } else {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, to)?;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_sorted_without_dotfiles() {
        let dir = TempDir::new().unwrap();
        for name in ["b.js", "a.wxml", ".git", ".mina_i18n_ignore"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let names: Vec<_> = list_dir(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.wxml", "b.js"]);
    }

    #[test]
    fn test_copy_recursive() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("from");
        fs::create_dir_all(from.join("nested/deeper")).unwrap();
        fs::write(from.join("top.txt"), "top").unwrap();
        fs::write(from.join("nested/deeper/leaf.png"), [0xff, 0x00]).unwrap();

        let to = dir.path().join("to");
        assert_eq!(copy_recursive(&from, &to).unwrap(), 2);
        assert_eq!(fs::read_to_string(to.join("top.txt")).unwrap(), "top");
        assert_eq!(fs::read(to.join("nested/deeper/leaf.png")).unwrap(), vec![0xff, 0x00]);
    }

    #[test]
    fn test_copy_recursive_keeps_dotfiles() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("from");
        fs::create_dir_all(from.join(".config")).unwrap();
        fs::write(from.join(".eslintrc"), "{}").unwrap();
        fs::write(from.join(".config/settings.json"), "[]").unwrap();

        let to = dir.path().join("to");
        assert_eq!(copy_recursive(&from, &to).unwrap(), 2);
        assert_eq!(fs::read_to_string(to.join(".eslintrc")).unwrap(), "{}");
        assert_eq!(fs::read_to_string(to.join(".config/settings.json")).unwrap(), "[]");
    }

    #[test]
    fn test_list_missing_dir() {
        assert!(list_dir(Path::new("/nonexistent/mina")).is_err());
    }
}
