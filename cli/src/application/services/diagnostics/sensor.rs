//! Status sensing from rendered page text.

use crate::application::ports::{StatusSensor, UiActionPort};
use crate::domain::status::{StatusMarkers, classify};
use crate::domain::{CollectionStatus, DeviceProfile, UiError};

/// Classifies the page body by the profile's status markers.
#[derive(Debug, Clone)]
pub struct TextMarkerSensor {
    collecting: String,
    standby: String,
}

impl TextMarkerSensor {
    #[must_use]
    pub fn new(collecting: impl Into<String>, standby: impl Into<String>) -> Self {
        Self {
            collecting: collecting.into(),
            standby: standby.into(),
        }
    }

    #[must_use]
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        let markers = profile.status_markers();
        Self::new(markers.collecting, markers.standby)
    }
}

impl StatusSensor for TextMarkerSensor {
    async fn read_status(&self, ui: &impl UiActionPort) -> Result<CollectionStatus, UiError> {
        let body = ui.body_text().await?;
        Ok(classify(
            &body,
            &StatusMarkers {
                collecting: &self.collecting,
                standby: &self.standby,
            },
        ))
    }
}
