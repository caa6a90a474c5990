//! String helpers shared by the request pipeline and the API sections.

// self
use crate::_prelude::*;

/// Ordered query-string parameters appended to a path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	/// Creates an empty parameter list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a parameter.
	pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.push(key, value);

		self
	}

	/// Appends a parameter in place.
	pub fn push(&mut self, key: impl Into<String>, value: impl Display) {
		self.0.push((key.into(), value.to_string()));
	}

	/// Returns `true` when no parameter is set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over key/value pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Escaped `key=value` pairs joined with `&`.
	pub fn to_query_string(&self) -> String {
		self.iter()
			.map(|(key, value)| format!("{}={}", escape(key), escape(value)))
			.collect::<Vec<_>>()
			.join("&")
	}
}
impl<K, V> FromIterator<(K, V)> for QueryParams
where
	K: Into<String>,
	V: Display,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Self::new();

		for (key, value) in iter {
			params.push(key, value);
		}

		params
	}
}

/// Removes the trailing ` (N)` disambiguation suffix from an artist name.
///
/// `"Artist (2)"` becomes `"Artist"`; names without a numeric suffix are returned unchanged.
pub fn strip_variation(name: &str) -> &str {
	let Some(inner) = name.strip_suffix(')') else {
		return name;
	};
	let Some(open) = inner.rfind('(') else {
		return name;
	};
	let digits = &inner[open + 1..];

	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return name;
	}

	match inner[..open].char_indices().next_back() {
		Some((idx, c)) if c.is_whitespace() => &name[..idx],
		_ => name,
	}
}

/// Appends `params` to a URL or path, using `?` or `&` depending on what is already present.
pub fn add_params(url: &str, params: &QueryParams) -> String {
	if params.is_empty() {
		return url.to_owned();
	}

	let separator = if url.contains('?') { '&' } else { '?' };

	format!("{url}{separator}{}", params.to_query_string())
}

/// Percent-encodes a path segment or query component.
///
/// Letters, digits, and `-_.!~*'()` pass through untouched; everything else is encoded as UTF-8
/// `%XX` sequences.
pub fn escape(input: &str) -> String {
	encode(input, |b| matches!(b, b'!' | b'~' | b'*' | b'\'' | b'(' | b')'))
}

/// Strict RFC 3986 percent-encoding, as required for OAuth 1.0a parameters.
pub fn percent_encode(input: &str) -> String {
	encode(input, |b| b == b'~')
}

fn encode(input: &str, keep_mark: impl Fn(u8) -> bool) -> String {
	const HEX: &[u8; 16] = b"0123456789ABCDEF";

	let mut out = String::with_capacity(input.len());

	for b in input.bytes() {
		if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.') || keep_mark(b) {
			out.push(b as char);
		} else {
			out.push('%');
			out.push(HEX[(b >> 4) as usize] as char);
			out.push(HEX[(b & 0x0F) as usize] as char);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn strip_variation_removes_numeric_suffix() {
		assert_eq!(strip_variation("Artist (2)"), "Artist");
		assert_eq!(strip_variation("Artist (12)"), "Artist");
		assert_eq!(strip_variation("Artist"), "Artist");
		assert_eq!(strip_variation("Artist (Live)"), "Artist (Live)");
		assert_eq!(strip_variation("Artist(2)"), "Artist(2)");
		assert_eq!(strip_variation("Artist ()"), "Artist ()");
	}

	#[test]
	fn add_params_picks_separator() {
		let params = QueryParams::new().with("foo", "bar").with("baz", 1);

		assert_eq!(add_params("http://an-url.com", &params), "http://an-url.com?foo=bar&baz=1");
		assert_eq!(
			add_params("http://an-url.com?y=5", &params),
			"http://an-url.com?y=5&foo=bar&baz=1"
		);
		assert_eq!(add_params("/path", &QueryParams::new()), "/path");
	}

	#[test]
	fn escape_keeps_unreserved_marks() {
		assert_eq!(escape("!@#$%^&*()+"), "!%40%23%24%25%5E%26*()%2B");
		assert_eq!(escape("a b/ü"), "a%20b%2F%C3%BC");
	}

	#[test]
	fn percent_encode_is_strict() {
		assert_eq!(percent_encode("!*'()~"), "%21%2A%27%28%29~");
		assert_eq!(percent_encode("https://x.y/?a=b"), "https%3A%2F%2Fx.y%2F%3Fa%3Db");
	}

	#[test]
	fn query_params_collect_from_pairs() {
		let params = [("q", "nirvana"), ("type", "artist")].into_iter().collect::<QueryParams>();

		assert_eq!(params.to_query_string(), "q=nirvana&type=artist");
	}
}
