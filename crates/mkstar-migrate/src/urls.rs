//! Asset URL mapping and link rewriting.
//!
//! Copied assets are registered in a [`UrlMap`] under three keys (full source
//! path, path relative to the source root, bare file name), all pointing to
//! the public URL. [`rewrite_urls`] then replaces local references in
//! converted markdown with those URLs.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::walk::{normalize, to_slash};

static TARGET_BLANK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{:\s*target=["']_blank["']\s*\}"#).expect("invalid target attribute regex")
});

/// `![alt](path)` and `![alt](path "title")`.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"[^"]*")?\)"#).expect("invalid image regex")
});

/// `[text](path)`, with a leading `!` captured so images can be skipped.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)]+)\)").expect("invalid link regex"));

/// `<img ... src="path" ...>`.
static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img([^>]+)src=["']([^"']+)["']([^>]*)>"#).expect("invalid img tag regex")
});

static EXTERNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?|mailto|ftp|tel):").expect("invalid external URL regex")
});

/// Lookup table from asset references to public URLs.
#[derive(Clone, Debug, Default)]
pub struct UrlMap {
    urls: HashMap<String, String>,
}

impl UrlMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a copied asset.
    ///
    /// `source` is the asset's full path and `relative` its path below the
    /// section's source root. Returns the public URL:
    /// `public_path` followed by `relative` with forward slashes.
    pub fn register(&mut self, source: &Path, relative: &Path, public_path: &str) -> String {
        let relative_key = to_slash(relative);
        let url = format!("{public_path}{relative_key}");

        self.urls
            .insert(source.to_string_lossy().into_owned(), url.clone());
        if let Some(name) = relative.file_name() {
            self.urls
                .insert(name.to_string_lossy().into_owned(), url.clone());
        }
        self.urls.insert(relative_key, url.clone());

        url
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Resolve a reference found in `markdown_file` to a public URL.
    ///
    /// Lookup order: the reference as written, the reference resolved
    /// against the markdown file's directory, that path relative to
    /// `source_root`, and finally the bare file name. External and anchor
    /// references never resolve, and absolute paths only resolve through
    /// an exact match.
    #[must_use]
    pub fn resolve(&self, reference: &str, markdown_file: &Path, source_root: &Path) -> Option<&str> {
        if EXTERNAL_RE.is_match(reference) || reference.starts_with('#') {
            return None;
        }

        if let Some(url) = self.urls.get(reference) {
            return Some(url);
        }
        if reference.starts_with('/') {
            return None;
        }

        let markdown_dir = markdown_file.parent().unwrap_or(Path::new(""));
        let resolved: PathBuf = normalize(&markdown_dir.join(reference));
        if let Some(url) = self.urls.get(resolved.to_string_lossy().as_ref()) {
            return Some(url);
        }

        if let Ok(relative) = resolved.strip_prefix(source_root)
            && let Some(url) = self.urls.get(&to_slash(relative))
        {
            return Some(url);
        }

        Path::new(reference)
            .file_name()
            .and_then(|name| self.urls.get(name.to_string_lossy().as_ref()))
            .map(String::as_str)
    }
}

/// Rewrite local asset references in converted markdown.
///
/// Drops Material's `{:target="_blank"}` link attributes, then rewrites
/// image references, links and `<img>` tags whose target resolves through
/// `urls`. Unresolved references are left untouched. An image title is not
/// carried over.
#[must_use]
pub fn rewrite_urls(content: &str, markdown_file: &Path, source_root: &Path, urls: &UrlMap) -> String {
    let resolve = |reference: &str| urls.resolve(reference.trim(), markdown_file, source_root);

    let content = TARGET_BLANK_RE.replace_all(content, "");

    let content = replace(&IMAGE_RE, content, |caps| {
        resolve(&caps[2]).map(|url| format!("![{}]({url})", &caps[1]))
    });

    let content = replace(&LINK_RE, content, |caps| {
        if !caps[1].is_empty() {
            return None;
        }
        resolve(&caps[3]).map(|url| format!("[{}]({url})", &caps[2]))
    });

    let content = replace(&IMG_TAG_RE, content, |caps| {
        resolve(&caps[2]).map(|url| format!("<img{}src=\"{url}\"{}>", &caps[1], &caps[3]))
    });

    content.into_owned()
}

/// Replace every match for which `rewrite` returns a value, keeping the rest.
fn replace<'a>(
    re: &Regex,
    text: Cow<'a, str>,
    rewrite: impl Fn(&Captures<'_>) -> Option<String>,
) -> Cow<'a, str> {
    if !re.is_match(&text) {
        return text;
    }
    let replaced = re
        .replace_all(&text, |caps: &Captures<'_>| {
            rewrite(caps).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned();
    Cow::Owned(replaced)
}
