//! Key and value dictionaries of a vector tile layer.
//!
//! Features reference their attributes by index into these dictionaries, so decoded dictionaries
//! are kept exactly as they appear on the wire, duplicates included. New entries added while merging
//! layers are deduplicated.

use super::GeoValue;
use anyhow::{Result, anyhow, ensure};
use itertools::Itertools;
use std::{collections::HashMap, fmt::Debug, hash::Hash};

#[derive(Clone, PartialEq)]
pub struct VTLPMap<T>
where
	T: Clone + Eq + Hash,
{
	pub list: Vec<T>,
	pub map: HashMap<T, u32>,
}

impl<T> VTLPMap<T>
where
	T: Clone + Debug + Eq + Hash,
{
	pub fn new(list: Vec<T>) -> VTLPMap<T> {
		let mut map = HashMap::new();
		for (i, e) in list.iter().enumerate() {
			map.entry(e.clone()).or_insert(i as u32);
		}
		VTLPMap { list, map }
	}

	/// Appends `entry` unconditionally and returns its index.
	pub fn push(&mut self, entry: T) -> u32 {
		let index = self.list.len() as u32;
		self.map.entry(entry.clone()).or_insert(index);
		self.list.push(entry);
		index
	}

	/// Returns the index of `entry`, appending it first if it is not present.
	pub fn add(&mut self, entry: T) -> u32 {
		if let Some(index) = self.map.get(&entry) {
			return *index;
		}
		self.push(entry)
	}

	pub fn get(&self, id: u32) -> Result<&T> {
		self
			.list
			.get(id as usize)
			.ok_or_else(|| anyhow!("index {id} is out of bounds ({} entries)", self.list.len()))
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
		self.list.iter()
	}

	pub fn len(&self) -> usize {
		self.list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}
}

impl<T: Clone + Debug + Eq + Hash> Default for VTLPMap<T> {
	fn default() -> VTLPMap<T> {
		VTLPMap::new(vec![])
	}
}

impl<T> Debug for VTLPMap<T>
where
	T: Clone + Debug + Eq + Hash,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.list).finish()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyManager {
	pub key: VTLPMap<String>,
	pub val: VTLPMap<GeoValue>,
}

impl PropertyManager {
	pub fn new() -> Self {
		Self::default()
	}

	#[cfg(test)]
	pub fn from_slices(keys: &[&str], values: &[&str]) -> Self {
		Self {
			key: VTLPMap::new(keys.iter().map(|k| (*k).to_string()).collect()),
			val: VTLPMap::new(values.iter().map(|v| GeoValue::from(*v)).collect()),
		}
	}

	pub fn push_key(&mut self, key: String) -> u32 {
		self.key.push(key)
	}

	pub fn push_val(&mut self, value: GeoValue) -> u32 {
		self.val.push(value)
	}

	pub fn add_key(&mut self, key: String) -> u32 {
		self.key.add(key)
	}

	pub fn add_val(&mut self, value: GeoValue) -> u32 {
		self.val.add(value)
	}

	pub fn iter_key(&self) -> impl Iterator<Item = &String> + '_ {
		self.key.iter()
	}

	pub fn iter_val(&self) -> impl Iterator<Item = &GeoValue> + '_ {
		self.val.iter()
	}

	/// Resolves a flat tag list into `(key, value)` pairs.
	pub fn decode_tag_ids(&self, tag_ids: &[u32]) -> Result<Vec<(&String, &GeoValue)>> {
		ensure!(
			tag_ids.len().is_multiple_of(2),
			"tag list has an odd number of entries ({})",
			tag_ids.len()
		);
		tag_ids
			.iter()
			.tuples()
			.map(|(k, v)| Ok((self.key.get(*k)?, self.val.get(*v)?)))
			.collect()
	}

	/// Re-encodes tags that index into `source` so they index into `self`.
	pub fn copy_tag_ids(&mut self, source: &PropertyManager, tag_ids: &[u32]) -> Result<Vec<u32>> {
		let mut result = Vec::with_capacity(tag_ids.len());
		for (key, val) in source.decode_tag_ids(tag_ids)? {
			result.push(self.add_key(key.clone()));
			result.push(self.add_val(val.clone()));
		}
		Ok(result)
	}
}
