//! Domain types and validators for diagpull configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access. Defaults
//! describe the Zyxel USG Flex H web console.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::selector::{RowQuery, Selector};
use crate::domain::status::StatusMarkers;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.diagpull/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiagpullConfig {
    /// Settle delays and wait bounds.
    pub timings: Timings,
    /// Console layout: selectors, markers and the file table shape.
    pub device: DeviceProfile,
}

/// Settle delays and wait bounds, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Bound for loading the login page.
    pub page_load_ms: u64,
    /// Bound for the login form to render.
    pub login_form_ms: u64,
    /// Bound for leaving the login page after submitting credentials.
    pub login_redirect_ms: u64,
    /// How often the current address is checked while waiting for login.
    pub address_poll_ms: u64,
    /// Delay after opening the top-level menu section.
    pub section_settle_ms: u64,
    /// Delay after opening the diagnostics sub-section.
    pub subsection_settle_ms: u64,
    /// Bound for a menu control to appear before clicking it.
    pub menu_click_ms: u64,
    /// Bound for the collection trigger control to appear.
    pub trigger_click_ms: u64,
    /// Delay between clicking the trigger and re-reading the status.
    pub trigger_settle_ms: u64,
    /// Interval between status reads while collecting.
    pub poll_interval_ms: u64,
    /// Delay before reading the file table after collection.
    pub artifact_settle_ms: u64,
    /// Delay after ticking the file's selection checkbox.
    pub selection_settle_ms: u64,
    /// Bound for the bundle transfer to complete.
    pub download_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            page_load_ms: 30_000,
            login_form_ms: 15_000,
            login_redirect_ms: 15_000,
            address_poll_ms: 250,
            section_settle_ms: 1_500,
            subsection_settle_ms: 5_000,
            menu_click_ms: 30_000,
            trigger_click_ms: 5_000,
            trigger_settle_ms: 3_000,
            poll_interval_ms: 10_000,
            artifact_settle_ms: 2_000,
            selection_settle_ms: 1_000,
            download_ms: 120_000,
        }
    }
}

macro_rules! duration_accessors {
    ($($name:ident => $field:ident),* $(,)?) => {
        impl Timings {
            $(
                #[must_use]
                pub fn $name(&self) -> Duration {
                    Duration::from_millis(self.$field)
                }
            )*
        }
    };
}

duration_accessors! {
    page_load => page_load_ms,
    login_form => login_form_ms,
    login_redirect => login_redirect_ms,
    address_poll => address_poll_ms,
    section_settle => section_settle_ms,
    subsection_settle => subsection_settle_ms,
    menu_click => menu_click_ms,
    trigger_click => trigger_click_ms,
    trigger_settle => trigger_settle_ms,
    poll_interval => poll_interval_ms,
    artifact_settle => artifact_settle_ms,
    selection_settle => selection_settle_ms,
    download => download_ms,
}

/// Layout of the device's web console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub username_field: Selector,
    pub password_field: Selector,
    pub login_button: Selector,
    /// Address fragment that appears once logged in.
    pub post_login_address: String,
    /// Address fragment of the login page, matched case-insensitively.
    pub login_address: String,
    /// Optional page text that only the login page shows.
    pub login_text: Option<String>,
    pub section_menu: Selector,
    pub diagnostics_menu: Selector,
    /// Address fragment of the diagnostics view, matched case-insensitively.
    pub diagnostics_address: String,
    pub collecting_marker: String,
    pub standby_marker: String,
    pub collect_button: Selector,
    pub file_table: FileTableLayout,
    /// Token every diagnostics bundle file name contains.
    pub artifact_marker: String,
    /// Selection control inside the artifact's table row.
    pub row_checkbox: String,
    pub download_button: Selector,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            username_field: Selector::css("input[name=\"username\"]"),
            password_field: Selector::css("input[name=\"password\"]"),
            login_button: Selector::button_text("Login"),
            post_login_address: "/dashboard/".to_string(),
            login_address: "login".to_string(),
            login_text: None,
            section_menu: Selector::text("Maintenance"),
            diagnostics_menu: Selector::text("Diagnostics"),
            diagnostics_address: "diagnostics".to_string(),
            collecting_marker: "Data collection in progress".to_string(),
            standby_marker: "Standby".to_string(),
            collect_button: Selector::button_text("Collect Now"),
            file_table: FileTableLayout::default(),
            artifact_marker: "diaginfo".to_string(),
            row_checkbox: "input[type=\"checkbox\"]".to_string(),
            download_button: Selector::text("Download"),
        }
    }
}

impl DeviceProfile {
    #[must_use]
    pub fn status_markers(&self) -> StatusMarkers<'_> {
        StatusMarkers {
            collecting: &self.collecting_marker,
            standby: &self.standby_marker,
        }
    }

    #[must_use]
    pub fn artifact_query(&self) -> RowQuery {
        RowQuery {
            rows: self.file_table.rows.clone(),
            min_cells: self.file_table.min_cells,
            name_cell: self.file_table.name_cell,
            size_cell: self.file_table.size_cell,
            marker: self.artifact_marker.clone(),
        }
    }

    /// Checkbox inside the table row listing `artifact_name`.
    #[must_use]
    pub fn artifact_checkbox(&self, artifact_name: &str) -> Selector {
        Selector::row_with_text(artifact_name, self.row_checkbox.clone())
    }
}

/// Shape of the device's file table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTableLayout {
    pub rows: String,
    pub min_cells: usize,
    pub name_cell: usize,
    pub size_cell: usize,
}

impl Default for FileTableLayout {
    fn default() -> Self {
        Self {
            rows: "table tbody tr".to_string(),
            min_cells: 4,
            name_cell: 1,
            size_cell: 2,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns the first problem found: an empty marker, a zero poll interval,
/// or a file table cell index outside the minimum cell count.
pub fn validate_config(config: &DiagpullConfig) -> Result<(), ConfigError> {
    let device = &config.device;
    for (key, value) in [
        ("device.post_login_address", &device.post_login_address),
        ("device.login_address", &device.login_address),
        ("device.diagnostics_address", &device.diagnostics_address),
        ("device.collecting_marker", &device.collecting_marker),
        ("device.standby_marker", &device.standby_marker),
        ("device.artifact_marker", &device.artifact_marker),
        ("device.row_checkbox", &device.row_checkbox),
        ("device.file_table.rows", &device.file_table.rows),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyValue { key });
        }
    }
    if config.timings.poll_interval_ms == 0 {
        return Err(ConfigError::ZeroDuration {
            key: "timings.poll_interval_ms",
        });
    }
    if config.timings.address_poll_ms == 0 {
        return Err(ConfigError::ZeroDuration {
            key: "timings.address_poll_ms",
        });
    }
    let table = &device.file_table;
    for index in [table.name_cell, table.size_cell] {
        if index >= table.min_cells {
            return Err(ConfigError::CellOutOfRange {
                index,
                min_cells: table.min_cells,
            });
        }
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
