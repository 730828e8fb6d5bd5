use std::{fs, io, path::Path};

pub const EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff", "tif", "ico",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// File names of the images directly inside `dir`, sorted by name.
pub fn scan_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .filter_map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.to_string())
        })
        .collect();

    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.png")));
        assert!(is_image_file(Path::new("B.JPG")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_scan_dir_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.png", "A.jpg", "c.txt", "d.gif"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested.png")).unwrap();

        let names = scan_dir(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["A.jpg", "b.png", "d.gif"]);
    }

    #[test]
    fn test_scan_missing_dir() {
        assert!(scan_dir(Path::new("/definitely/not/here")).is_err());
    }
}
