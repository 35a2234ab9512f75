/// Allocates point ids and clip ids for one split operation.
///
/// Both counters start at 0 and hand out `1, 2, 3, ...`; 0 always means "no id".
#[derive(Debug, Default)]
pub struct IdPool {
	last_point_id: u64,
	last_clip_id: u64,
}

impl IdPool {
	pub fn new() -> IdPool {
		IdPool::default()
	}

	pub fn next_point_id(&mut self) -> u64 {
		self.last_point_id += 1;
		self.last_point_id
	}

	pub fn next_clip_id(&mut self) -> u64 {
		self.last_clip_id += 1;
		self.last_clip_id
	}

	pub fn point_ids_used(&self) -> u64 {
		self.last_point_id
	}

	pub fn clip_ids_used(&self) -> u64 {
		self.last_clip_id
	}
}
