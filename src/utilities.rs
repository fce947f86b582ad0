use std::path::{Path, PathBuf};

/// Extensions of files that are found next to music files but are not music.
const EXCLUDED_EXTENSIONS: &[&str] = &[
    "log", "txt", "cue", "m3u", "m3u8", "nfo", "jpg", "jpeg", "png",
];

/// Removes paths that are not music files.
///
/// Paths without an extension are removed too.
pub fn filter_paths<T: AsRef<Path>>(paths: &[T]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter_map(|path| {
            let path = path.as_ref();

            if let Some(extension) = path.extension() {
                if let Some(extension) = extension.to_ascii_lowercase().to_str() {
                    if !EXCLUDED_EXTENSIONS.contains(&extension) {
                        return Some(path);
                    }
                }
            }

            None
        })
        .map(PathBuf::from)
        .collect()
}
