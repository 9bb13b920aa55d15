use url::Url;

const INDEX_SUFFIX: &str = "/index.html";

/// Treat `/dir/index.html` and `/dir/` as the same page.
pub fn normalize_path(path: &str) -> &str {
    let len = path.len();
    if len >= INDEX_SUFFIX.len() {
        let split = len - INDEX_SUFFIX.len();
        if path.is_char_boundary(split) && path[split..].eq_ignore_ascii_case(INDEX_SUFFIX) {
            // Keep the leading slash of the suffix.
            return &path[..=split];
        }
    }
    path
}

/// Active state for a nav link, or `None` when the link should be left alone
/// (empty or unresolvable href).
pub fn nav_link_active(href: &str, base: &Url, current: &Url) -> Option<bool> {
    if href.is_empty() {
        return None;
    }
    let link = base.join(href).ok()?;
    let matches = normalize_path(link.path()) == normalize_path(current.path());
    Some(matches && !href.contains('#'))
}

/// Apply [`nav_link_active`] over a list of hrefs.
pub fn active_flags<'a, I>(hrefs: I, base: &Url, current: &Url) -> Vec<Option<bool>>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .map(|href| nav_link_active(href, base, current))
        .collect()
}
