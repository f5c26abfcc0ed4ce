use citytrotter_core::models::Footprint;

/// Relative tolerance when comparing edge lengths
const SQUARE_TOLERANCE: f64 = 1e-9;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }
}

/// Validate a footprint received from outside the calculator, e.g. from a
/// map editing tool or a deserialized request.
pub fn validate_footprint(footprint: &Footprint) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let ring = footprint.ring();

    for (i, [lng, lat]) in ring.iter().enumerate() {
        if !lng.is_finite() || !lat.is_finite() {
            result.add_error(format!("Footprint[{}]", i), "Coordinates must be finite".to_string());
        } else if !(-180.0..=180.0).contains(lng) || !(-90.0..=90.0).contains(lat) {
            result.add_error(
                format!("Footprint[{}]", i),
                format!("({}, {}) is outside the WGS84 range", lng, lat),
            );
        }
    }
    if !result.is_valid {
        return result;
    }

    let [bl, br, tr, tl, _] = *ring;
    let axis_aligned = bl[1] == br[1] && br[0] == tr[0] && tr[1] == tl[1] && tl[0] == bl[0];
    if !axis_aligned {
        result.add_error("Footprint".to_string(), "Ring is not an axis-aligned rectangle".to_string());
        return result;
    }

    let width = br[0] - bl[0];
    let height = tl[1] - bl[1];
    if width <= 0.0 || height <= 0.0 {
        result.add_error(
            "Footprint".to_string(),
            "Ring must wind bottom-left, bottom-right, top-right, top-left with positive size"
                .to_string(),
        );
    } else if (width - height).abs() > SQUARE_TOLERANCE * width.max(height) {
        result.add_error(
            "Footprint".to_string(),
            format!("Ring is not square: width {} vs height {}", width, height),
        );
    }

    result
}
