use citytrotter_core::error::Result;
use citytrotter_core::models::{BuildingParameters, Footprint, Location};
use citytrotter_geo::compute_footprint;

/// The placed building: where it is, what it is, and whether an analysis
/// has ever been accepted for it in this session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteState {
    location: Option<Location>,
    /// Position of a drag in progress, observed only by live previews
    preview: Option<Location>,
    parameters: BuildingParameters,
    has_analyzed: bool,
}

impl SiteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the building. Never triggers analysis on its own.
    pub fn select_location(&mut self, location: Location) -> Result<()> {
        location.validate()?;
        self.location = Some(location);
        self.preview = None;
        Ok(())
    }

    /// Transient position while the marker is being dragged
    pub fn begin_move(&mut self, location: Location) -> Result<()> {
        location.validate()?;
        self.preview = Some(location);
        Ok(())
    }

    /// Settle a drag gesture at its final position
    pub fn commit_move(&mut self, location: Location) -> Result<()> {
        location.validate()?;
        self.location = Some(location);
        self.preview = None;
        Ok(())
    }

    /// Replace the building parameters wholesale
    pub fn update_parameters(&mut self, parameters: BuildingParameters) -> Result<()> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    /// Return to the initial empty site
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn mark_analyzed(&mut self) {
        self.has_analyzed = true;
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Drag position if a drag is in progress, otherwise the committed location
    pub fn preview_location(&self) -> Option<Location> {
        self.preview.or(self.location)
    }

    pub fn is_moving(&self) -> bool {
        self.preview.is_some()
    }

    pub fn parameters(&self) -> &BuildingParameters {
        &self.parameters
    }

    pub fn has_analyzed(&self) -> bool {
        self.has_analyzed
    }

    /// Footprint at the committed location
    pub fn footprint(&self) -> Option<Footprint> {
        self.location.map(|loc| compute_footprint(&loc, self.parameters.footprint_area_sq_ft))
    }

    /// Footprint following a drag in progress
    pub fn preview_footprint(&self) -> Option<Footprint> {
        self.preview_location()
            .map(|loc| compute_footprint(&loc, self.parameters.footprint_area_sq_ft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citytrotter_core::error::CitytrotterError;

    fn downtown() -> Location {
        Location { lat: 33.7490, lng: -84.3880 }
    }

    #[test]
    fn test_starts_empty() {
        let site = SiteState::new();
        assert!(site.location().is_none());
        assert!(site.footprint().is_none());
        assert!(!site.has_analyzed());
        assert_eq!(site.parameters(), &BuildingParameters::default());
    }

    #[test]
    fn test_drag_preview_does_not_move_committed_location() {
        let mut site = SiteState::new();
        site.select_location(downtown()).unwrap();

        let dragged = Location { lat: 33.7810, lng: -84.3860 };
        site.begin_move(dragged).unwrap();

        assert_eq!(site.location(), Some(downtown()));
        assert_eq!(site.preview_location(), Some(dragged));
        assert!(site.is_moving());
        assert_ne!(site.footprint(), site.preview_footprint());

        site.commit_move(dragged).unwrap();
        assert_eq!(site.location(), Some(dragged));
        assert!(!site.is_moving());
        assert_eq!(site.footprint(), site.preview_footprint());
    }

    #[test]
    fn test_invalid_locations_are_rejected() {
        let mut site = SiteState::new();
        site.select_location(downtown()).unwrap();

        let err = site.select_location(Location { lat: f64::NAN, lng: -84.388 }).unwrap_err();
        assert!(err.is_validation());
        assert!(site.begin_move(Location { lat: 33.749, lng: 200.0 }).is_err());
        assert!(site.commit_move(Location { lat: -91.0, lng: -84.388 }).is_err());

        assert_eq!(site.location(), Some(downtown()));
        assert!(!site.is_moving());
    }

    #[test]
    fn test_invalid_parameters_leave_state_unchanged() {
        let mut site = SiteState::new();
        let err = site
            .update_parameters(BuildingParameters { stories: 40, ..Default::default() })
            .unwrap_err();

        assert!(matches!(err, CitytrotterError::InvalidParameters { field: "stories", .. }));
        assert_eq!(site.parameters().stories, 8);
    }

    #[test]
    fn test_footprint_follows_area() {
        let mut site = SiteState::new();
        site.select_location(downtown()).unwrap();
        site.update_parameters(BuildingParameters { footprint_area_sq_ft: 6400.0, ..Default::default() })
            .unwrap();

        let footprint = site.footprint().unwrap();
        assert_eq!(footprint, compute_footprint(&downtown(), 6400.0));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut site = SiteState::new();
        site.select_location(downtown()).unwrap();
        site.update_parameters(BuildingParameters { units: 12, ..Default::default() }).unwrap();
        site.mark_analyzed();

        site.reset();
        assert_eq!(site, SiteState::default());
    }
}
