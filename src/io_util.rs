use std::{fs::{create_dir_all, read_to_string, write}, path::Path};

use anyhow::{Result, anyhow, Context};


pub fn my_read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    read_to_string(&path).with_context(
        || anyhow!("opening path for reading: {:?}", path.as_ref()))
}

/// Write `contents` to `path`, first creating any missing parent
/// directories.
pub fn write_creating_dirs<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            create_dir_all(dir).with_context(
                || anyhow!("creating directory {dir:?}"))?;
        }
    }
    write(path, contents).with_context(
        || anyhow!("writing to {path:?}"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_write_creating_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a/b/c/out.html");
        write_creating_dirs(&path, "<p>x</p>").unwrap();
        assert_eq!(my_read_to_string(&path).unwrap(), "<p>x</p>");
        // again, directories exist now
        write_creating_dirs(&path, "y").unwrap();
        assert_eq!(my_read_to_string(&path).unwrap(), "y");
    }

    #[test]
    fn t_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.js");
        let e = my_read_to_string(&missing).unwrap_err();
        assert!(format!("{e:#}").contains("missing.js"));

        let file = tmp.path().join("file");
        write_creating_dirs(&file, "").unwrap();
        // parent is a file, can't be created as a directory
        assert!(write_creating_dirs(file.join("sub/out.html"), "x").is_err());
    }
}
