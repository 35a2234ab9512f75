/// Wire-level geometry type of a vector tile feature.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	MultiPoint = 1,
	MultiLineString = 2,
	MultiPolygon = 3,
}

impl GeomType {
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}

	/// Short lowercase label used in statistics output.
	pub fn as_str(&self) -> &'static str {
		match self {
			GeomType::Unknown => "unknown",
			GeomType::MultiPoint => "point",
			GeomType::MultiLineString => "line",
			GeomType::MultiPolygon => "polygon",
		}
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::MultiPoint,
			2 => GeomType::MultiLineString,
			3 => GeomType::MultiPolygon,
			_ => GeomType::Unknown,
		}
	}
}
