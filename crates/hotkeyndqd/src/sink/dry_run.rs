//! Backend that logs events instead of sending them to a simulator.
//!
//! Useful on machines without the simulator installed: the relay behaves as
//! it would in production, including "unknown event mapping" warnings for
//! names the simulator would reject.

use std::sync::Arc;

use tracing::info;

use super::SINK_TARGET;
use super::backend::{EventBackend, EventHandler, EventRegistry, EventValue, SinkError};

/// Simulator events the dry-run registry accepts.
const KNOWN_EVENTS: &[&str] = &[
    // Power and systems
    "AVIONICS_MASTER_SET",
    "TOGGLE_MASTER_BATTERY",
    "TOGGLE_MASTER_ALTERNATOR",
    "TOGGLE_ELECT_FUEL_PUMP",
    "ANTI_ICE_SET",
    "TOGGLE_STRUCTURAL_DEICE",
    "PITOT_HEAT_TOGGLE",
    // Engine
    "ENGINE_AUTO_START",
    "ENGINE_AUTO_SHUTDOWN",
    "TOGGLE_PRIMER",
    "MAGNETO_OFF",
    "MAGNETO_LEFT",
    "MAGNETO_RIGHT",
    "MAGNETO_BOTH",
    "MAGNETO_START",
    "THROTTLE_INCR",
    "THROTTLE_DECR",
    "THROTTLE_FULL",
    "THROTTLE_CUT",
    "MIXTURE_INCR",
    "MIXTURE_DECR",
    "PROP_PITCH_INCR",
    "PROP_PITCH_DECR",
    // Flight controls
    "GEAR_TOGGLE",
    "FLAPS_UP",
    "FLAPS_DOWN",
    "FLAPS_INCR",
    "FLAPS_DECR",
    "PARKING_BRAKES",
    "BRAKES_LEFT",
    "BRAKES_RIGHT",
    "ELEV_TRIM_UP",
    "ELEV_TRIM_DN",
    "AILERON_TRIM_LEFT",
    "AILERON_TRIM_RIGHT",
    "RUDDER_TRIM_LEFT",
    "RUDDER_TRIM_RIGHT",
    "YAW_DAMPER_TOGGLE",
    // Autopilot
    "AP_MASTER",
    "AP_HDG_HOLD",
    "AP_ALT_HOLD",
    "AP_NAV1_HOLD",
    "AP_APR_HOLD",
    "AP_BC_HOLD",
    "AP_PANEL_VS_SET",
    "AP_PANEL_SPEED_SET",
    "AP_ALT_VAR_INC",
    "AP_ALT_VAR_DEC",
    "AP_VS_VAR_INC",
    "AP_VS_VAR_DEC",
    "AP_SPD_VAR_INC",
    "AP_SPD_VAR_DEC",
    "HEADING_BUG_INC",
    "HEADING_BUG_DEC",
    // Lights
    "LANDING_LIGHTS_TOGGLE",
    "STROBES_TOGGLE",
    "PANEL_LIGHTS_TOGGLE",
    "TOGGLE_TAXI_LIGHTS",
    "TOGGLE_NAV_LIGHTS",
    "TOGGLE_BEACON_LIGHTS",
    "TOGGLE_CABIN_LIGHTS",
    "TOGGLE_LOGO_LIGHTS",
    "TOGGLE_RECOGNITION_LIGHTS",
    "TOGGLE_INSTRUMENT_LIGHTS",
    // Views
    "NEXT_VIEW",
    "PREV_VIEW",
    "VIEW_COCKPIT_FORWARD",
    "VIEW_MODE",
    "VIEW_RESET",
    "VIEW_FORWARD",
    "VIEW_FORWARD_LEFT",
    "VIEW_FORWARD_RIGHT",
    "VIEW_LEFT",
    "VIEW_RIGHT",
    "VIEW_REAR",
    "VIEW_UP",
    "VIEW_DOWN",
    "VIEW_TOP_DOWN",
    // Drone camera
    "TOGGLE_DRONE_CAMERA",
    "DRONE_CAMERA_RESET",
    "DRONE_CAMERA_FOLLOW_SET",
    "TOGGLE_DRONE_CAMERA_LOCK",
];

/// Backend whose registry accepts a fixed event catalogue and logs each
/// invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunBackend;

impl DryRunBackend {
    /// Builds the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventBackend for DryRunBackend {
    fn open_registry(&self) -> Result<Box<dyn EventRegistry>, SinkError> {
        Ok(Box::new(DryRunRegistry))
    }
}

struct DryRunRegistry;

impl EventRegistry for DryRunRegistry {
    fn resolve(&self, event: &str) -> Option<Arc<dyn EventHandler>> {
        KNOWN_EVENTS
            .iter()
            .copied()
            .find(|known| *known == event)
            .map(|known| Arc::new(DryRunHandler { event: known }) as Arc<dyn EventHandler>)
    }
}

struct DryRunHandler {
    event: &'static str,
}

impl EventHandler for DryRunHandler {
    fn invoke(&self, value: Option<EventValue>) -> Result<(), SinkError> {
        match value {
            Some(value) => info!(
                target: SINK_TARGET,
                event = self.event,
                value = %value,
                "dry-run event fired"
            ),
            None => info!(
                target: SINK_TARGET,
                event = self.event,
                "dry-run event fired"
            ),
        }
        Ok(())
    }
}
