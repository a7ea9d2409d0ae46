/// Join an asset path onto the configured root with exactly one `/`
/// between them, whatever slashes either side already carries.
///
/// An empty root leaves the path untouched; an empty path yields the root.
pub fn resolve_path(root: &str, path: &str) -> String {
    if root.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return root.to_string();
    }
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{root}/{path}")
}
