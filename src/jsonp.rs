//! JSONP envelope handling.
//!
//! QQ Connect answers several endpoints with `callback( {...} );` instead of bare JSON, and the
//! callback name is not fixed. [`unwrap`] strips that envelope so the payload can go through the
//! regular JSON decoder.

/// Returns the payload inside a `name(...)` JSONP envelope.
///
/// The trailing `;` and surrounding whitespace are optional. The callback name may contain ASCII
/// alphanumerics, `_`, `$`, and `.`. Returns `None` when `body` is not wrapped, in which case the
/// caller should treat the trimmed body as-is.
pub fn unwrap(body: &str) -> Option<&str> {
	let body = body.trim();
	let body = body.strip_suffix(';').unwrap_or(body).trim_end();
	let open = body.find('(')?;
	let name = body[..open].trim_end();

	if name.is_empty() || !name.chars().all(is_callback_char) {
		return None;
	}

	let inner = body[open + 1..].strip_suffix(')')?;

	Some(inner.trim())
}

/// Returns the JSONP payload when wrapped, otherwise the trimmed body.
pub fn unwrap_or_trim(body: &str) -> &str {
	unwrap(body).unwrap_or_else(|| body.trim())
}

fn is_callback_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')
}
