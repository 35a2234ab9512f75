//! A small recursive-descent JSON reader.
//!
//! Used for `metadata.json` files next to tile directories. Errors carry the byte position.

use super::{JsonArray, JsonObject, JsonValue};
use anyhow::{Context, Error, Result, anyhow, bail};

/// Cursor over the bytes of a JSON document.
struct ByteCursor<'a> {
	bytes: &'a [u8],
	position: usize,
}

impl<'a> ByteCursor<'a> {
	fn new(bytes: &'a [u8]) -> ByteCursor<'a> {
		ByteCursor { bytes, position: 0 }
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.position).copied()
	}

	fn advance(&mut self) {
		self.position += 1;
	}

	fn format_error(&self, msg: &str) -> Error {
		anyhow!("{msg} at position {}", self.position)
	}

	fn expect_peeked_byte(&self) -> Result<u8> {
		self.peek().ok_or_else(|| self.format_error("unexpected end of input"))
	}

	fn expect_next_byte(&mut self) -> Result<u8> {
		let byte = self.expect_peeked_byte()?;
		self.advance();
		Ok(byte)
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
			self.advance();
		}
	}
}

fn parse_tag(cursor: &mut ByteCursor, tag: &str) -> Result<()> {
	for c in tag.bytes() {
		if cursor.expect_next_byte()? != c {
			return Err(cursor.format_error(&format!("unexpected character while parsing tag '{tag}'")));
		}
	}
	Ok(())
}

fn parse_quoted_json_string(cursor: &mut ByteCursor) -> Result<String> {
	if cursor.expect_next_byte()? != b'"' {
		bail!(cursor.format_error("expected '\"' while parsing a string"));
	}

	let mut bytes = Vec::with_capacity(32);
	loop {
		match cursor.expect_next_byte()? {
			b'"' => break,
			b'\\' => match cursor.expect_next_byte()? {
				b'b' => bytes.push(b'\x08'),
				b'f' => bytes.push(b'\x0C'),
				b'n' => bytes.push(b'\n'),
				b'r' => bytes.push(b'\r'),
				b't' => bytes.push(b'\t'),
				b'u' => {
					let mut hex = [0u8; 4];
					for h in &mut hex {
						*h = cursor.expect_next_byte()?;
					}
					let code_point = std::str::from_utf8(&hex)
						.ok()
						.and_then(|s| u32::from_str_radix(s, 16).ok())
						.and_then(char::from_u32)
						.ok_or_else(|| cursor.format_error("invalid unicode code point"))?;
					let mut buffer = [0u8; 4];
					bytes.extend_from_slice(code_point.encode_utf8(&mut buffer).as_bytes());
				}
				c => bytes.push(c),
			},
			c => bytes.push(c),
		}
	}
	String::from_utf8(bytes).map_err(Error::from)
}

fn parse_number(cursor: &mut ByteCursor) -> Result<f64> {
	let start = cursor.position;
	while matches!(cursor.peek(), Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')) {
		cursor.advance();
	}
	let text = std::str::from_utf8(&cursor.bytes[start..cursor.position])?;
	text
		.parse::<f64>()
		.map_err(|_| anyhow!("invalid number '{text}' at position {start}"))
}

fn parse_array(cursor: &mut ByteCursor) -> Result<JsonArray> {
	cursor.advance();
	let mut array = JsonArray::default();

	cursor.skip_whitespace();
	if cursor.expect_peeked_byte()? == b']' {
		cursor.advance();
		return Ok(array);
	}

	loop {
		array.0.push(parse_value(cursor)?);
		cursor.skip_whitespace();
		match cursor.expect_next_byte()? {
			b',' => {}
			b']' => break,
			_ => bail!(cursor.format_error("expected ',' or ']'")),
		}
	}
	Ok(array)
}

fn parse_object(cursor: &mut ByteCursor) -> Result<JsonObject> {
	cursor.advance();
	let mut object = JsonObject::new();

	loop {
		cursor.skip_whitespace();
		match cursor.expect_peeked_byte()? {
			b'}' if object.0.is_empty() => {
				cursor.advance();
				break;
			}
			b'"' => {
				let key = parse_quoted_json_string(cursor)?;
				cursor.skip_whitespace();
				if cursor.expect_next_byte()? != b':' {
					bail!(cursor.format_error("expected ':'"));
				}
				let value = parse_value(cursor)?;
				object.0.insert(key, value);

				cursor.skip_whitespace();
				match cursor.expect_next_byte()? {
					b',' => {}
					b'}' => break,
					_ => bail!(cursor.format_error("expected ',' or '}'")),
				}
			}
			_ => bail!(cursor.format_error("parsing object, expected '\"' or '}'")),
		}
	}
	Ok(object)
}

fn parse_value(cursor: &mut ByteCursor) -> Result<JsonValue> {
	cursor.skip_whitespace();
	Ok(match cursor.expect_peeked_byte()? {
		b'[' => JsonValue::Array(parse_array(cursor)?),
		b'{' => JsonValue::Object(parse_object(cursor)?),
		b'"' => JsonValue::String(parse_quoted_json_string(cursor)?),
		b'0'..=b'9' | b'-' => JsonValue::Number(parse_number(cursor)?),
		b't' => {
			parse_tag(cursor, "true")?;
			JsonValue::Boolean(true)
		}
		b'f' => {
			parse_tag(cursor, "false")?;
			JsonValue::Boolean(false)
		}
		b'n' => {
			parse_tag(cursor, "null")?;
			JsonValue::Null
		}
		_ => bail!(cursor.format_error("unexpected character")),
	})
}

impl JsonValue {
	/// Parses a complete JSON document.
	pub fn parse_str(json: &str) -> Result<JsonValue> {
		let mut cursor = ByteCursor::new(json.as_bytes());
		let value = parse_value(&mut cursor).with_context(|| format!("while parsing JSON '{json}'"))?;
		cursor.skip_whitespace();
		if cursor.peek().is_some() {
			return Err(cursor.format_error("unexpected trailing characters"))
				.with_context(|| format!("while parsing JSON '{json}'"));
		}
		Ok(value)
	}
}
