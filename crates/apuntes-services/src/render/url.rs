/// Drop everything from the first `?` on.
///
/// Stored URLs may carry signed-URL query strings (tokens, expiry) that must not
/// be surfaced to viewers.
pub fn clean_storage_url(url: &str) -> String {
    let url = url.trim();
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}
