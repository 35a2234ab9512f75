//! [`JsonValue`], [`JsonArray`] and [`JsonObject`].

use super::stringify;
use std::{collections::BTreeMap, fmt::Debug};

/// Any JSON value.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
	Array(JsonArray),
	Boolean(bool),
	Null,
	Number(f64),
	Object(JsonObject),
	String(String),
}

impl JsonValue {
	/// Serializes to compact JSON text.
	#[must_use]
	pub fn stringify(&self) -> String {
		stringify(self)
	}

	#[must_use]
	pub fn new_array() -> JsonValue {
		JsonValue::Array(JsonArray::default())
	}

	#[must_use]
	pub fn new_object() -> JsonValue {
		JsonValue::Object(JsonObject::default())
	}
}

/// A JSON array backed by a `Vec<JsonValue>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonArray(pub Vec<JsonValue>);

impl JsonArray {
	pub fn push<T: Into<JsonValue>>(&mut self, value: T) {
		self.0.push(value.into());
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self.0.iter().map(stringify).collect::<Vec<_>>();
		format!("[{}]", items.join(","))
	}
}

/// A JSON object backed by a `BTreeMap`, so keys are emitted in sorted order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonObject(pub BTreeMap<String, JsonValue>);

impl JsonObject {
	#[must_use]
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	pub fn set<T: Into<JsonValue>>(&mut self, key: &str, value: T) {
		self.0.insert(key.to_owned(), value.into());
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key)
	}

	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self
			.0
			.iter()
			.map(|(key, value)| format!("\"{}\":{}", super::escape_json_string(key), stringify(value)))
			.collect::<Vec<_>>();
		format!("{{{}}}", items.join(","))
	}
}

impl From<&str> for JsonValue {
	fn from(value: &str) -> Self {
		JsonValue::String(value.to_owned())
	}
}

impl From<String> for JsonValue {
	fn from(value: String) -> Self {
		JsonValue::String(value)
	}
}

impl From<&String> for JsonValue {
	fn from(value: &String) -> Self {
		JsonValue::String(value.clone())
	}
}

impl From<bool> for JsonValue {
	fn from(value: bool) -> Self {
		JsonValue::Boolean(value)
	}
}

impl From<f64> for JsonValue {
	fn from(value: f64) -> Self {
		JsonValue::Number(value)
	}
}

impl From<f32> for JsonValue {
	fn from(value: f32) -> Self {
		JsonValue::Number(f64::from(value))
	}
}

impl From<i64> for JsonValue {
	fn from(value: i64) -> Self {
		JsonValue::Number(value as f64)
	}
}

impl From<u64> for JsonValue {
	fn from(value: u64) -> Self {
		JsonValue::Number(value as f64)
	}
}

impl From<u32> for JsonValue {
	fn from(value: u32) -> Self {
		JsonValue::Number(f64::from(value))
	}
}

impl From<usize> for JsonValue {
	fn from(value: usize) -> Self {
		JsonValue::Number(value as f64)
	}
}

impl From<u8> for JsonValue {
	fn from(value: u8) -> Self {
		JsonValue::Number(f64::from(value))
	}
}

impl From<JsonArray> for JsonValue {
	fn from(value: JsonArray) -> Self {
		JsonValue::Array(value)
	}
}

impl From<JsonObject> for JsonValue {
	fn from(value: JsonObject) -> Self {
		JsonValue::Object(value)
	}
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
	fn from(value: Vec<T>) -> Self {
		JsonValue::Array(JsonArray(value.into_iter().map(Into::into).collect()))
	}
}

impl<T: Into<JsonValue>, const N: usize> From<[T; N]> for JsonValue {
	fn from(value: [T; N]) -> Self {
		JsonValue::Array(JsonArray(value.into_iter().map(Into::into).collect()))
	}
}
