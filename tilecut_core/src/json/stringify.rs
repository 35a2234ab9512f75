use super::JsonValue;

/// Serializes a [`JsonValue`] to compact JSON text.
///
/// Non-finite numbers have no JSON representation and are written as `null`.
pub fn stringify(json: &JsonValue) -> String {
	match json {
		JsonValue::String(s) => format!("\"{}\"", escape_json_string(s)),
		JsonValue::Number(n) if n.is_finite() => n.to_string(),
		JsonValue::Number(_) | JsonValue::Null => String::from("null"),
		JsonValue::Boolean(b) => b.to_string(),
		JsonValue::Array(arr) => arr.stringify(),
		JsonValue::Object(obj) => obj.stringify(),
	}
}

pub fn escape_json_string(input: &str) -> String {
	input
		.chars()
		.map(|c| match c {
			'"' => "\\\"".to_string(),
			'\\' => "\\\\".to_string(),
			'\n' => "\\n".to_string(),
			'\r' => "\\r".to_string(),
			'\t' => "\\t".to_string(),
			'\u{08}' => "\\b".to_string(),
			'\u{0c}' => "\\f".to_string(),
			c if c.is_control() => format!("\\u{:04x}", c as u32),
			c => c.to_string(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn primitives() {
		assert_eq!(stringify(&JsonValue::from("Hello")), "\"Hello\"");
		assert_eq!(stringify(&JsonValue::from(42u64)), "42");
		assert_eq!(stringify(&JsonValue::from(-0.25)), "-0.25");
		assert_eq!(stringify(&JsonValue::from(false)), "false");
		assert_eq!(stringify(&JsonValue::Null), "null");
		assert_eq!(stringify(&JsonValue::Number(f64::NAN)), "null");
	}

	#[test]
	fn escapes() {
		assert_eq!(
			escape_json_string("Line1\nLine2\t\"quoted\" \\ \u{1}"),
			"Line1\\nLine2\\t\\\"quoted\\\" \\\\ \\u0001"
		);
	}
}
