//! Physical constants and policy defaults

/// Mean radius of the Earth used by the haversine formula (miles)
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Statute mile in meters; scene units are meters
pub const METERS_PER_MILE: f64 = 1609.344;

/// Beyond this distance a building is hidden (miles, exclusive)
pub const DEFAULT_VISIBILITY_RADIUS_MILES: f64 = 0.25;

/// At or below this distance a building shows its detail card (miles, inclusive)
pub const DEFAULT_DETAIL_RADIUS_MILES: f64 = 0.10;

/// Duration of the label/detail cross-fade (seconds)
pub const DEFAULT_CROSSFADE_SECS: f64 = 1.0;

/// Opacity a representation fades in to
pub const DEFAULT_DETAIL_OPACITY: f64 = 0.92;

/// Fixed file name of the cached buildings dataset
pub const DEFAULT_CACHE_FILE_NAME: &str = "VTBuildings.plist";

/// Suffix appended to a building id to name its detail-card scene node
pub const DETAIL_NODE_SUFFIX: &str = "-detailsNode";
