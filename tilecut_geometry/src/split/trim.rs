use crate::vector_tile::VectorTile;

/// Removes features without geometry, then layers without features.
///
/// Walks back to front so removals do not shift the entries still to be visited.
pub fn trim_empty(tile: &mut VectorTile) {
	for i in (0..tile.layers.len()).rev() {
		let features = &mut tile.layers[i].features;
		for j in (0..features.len()).rev() {
			if features[j].geometry.is_empty() {
				features.remove(j);
			}
		}
		if features.is_empty() {
			tile.layers.remove(i);
		}
	}
}
