use regex::Regex;
use std::sync::LazyLock;

/// Path separators, characters OneDrive rejects in names, and control characters.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).unwrap());

const FALLBACK_NAME: &str = "archivo";

/// Make a client-supplied name safe to use as a single drive path segment.
pub fn sanitize_segment(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "-");
    let trimmed = replaced.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn join(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    let name = name.trim_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Split `a/b/c` into `(Some("a/b"), "c")`; a top-level name has no parent.
pub fn split_parent(path: &str) -> (Option<&str>, &str) {
    match path.trim_matches('/').rsplit_once('/') {
        Some((parent, name)) => (Some(parent), name),
        None => (None, path.trim_matches('/')),
    }
}

/// Every ancestor of `path` followed by the path itself: `a`, `a/b`, `a/b/c`.
pub fn prefixes(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        out.push(current.clone());
    }
    out
}

/// Percent-encode each segment, keeping the separators.
pub fn encode(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
