//! Translation of client command identifiers to simulator events.
//!
//! The Android client names some buttons differently from the simulator
//! events they fire, and sends on/off pairs where the simulator expects a
//! single set-style event with an argument. Identifiers without an alias
//! are forwarded unchanged.

use crate::sink::EventValue;

/// Event to fire for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedEvent<'a> {
    /// Simulator event name.
    pub event: &'a str,
    /// Argument passed to the event, if any.
    pub value: Option<EventValue>,
}

/// Resolves a command identifier to the event it triggers.
///
/// Pure and allocation-free; safe to call from any number of threads.
///
/// # Examples
///
/// ```
/// use hotkeyndqd::{EventValue, resolve_command};
///
/// let on = resolve_command("AVIONICS_MASTER_ON");
/// assert_eq!(on.event, "AVIONICS_MASTER_SET");
/// assert_eq!(on.value, Some(EventValue::Number(1)));
///
/// let gear = resolve_command("GEAR_TOGGLE");
/// assert_eq!(gear.event, "GEAR_TOGGLE");
/// assert_eq!(gear.value, None);
/// ```
#[must_use]
pub fn resolve_command(command: &str) -> MappedEvent<'_> {
    match alias(command) {
        Some((event, value)) => MappedEvent { event, value },
        None => MappedEvent {
            event: command,
            value: None,
        },
    }
}

fn alias(command: &str) -> Option<(&'static str, Option<EventValue>)> {
    use EventValue::{Flag, Number};

    let mapped = match command {
        // Power and systems
        "AVIONICS_MASTER_ON" => ("AVIONICS_MASTER_SET", Some(Number(1))),
        "AVIONICS_MASTER_OFF" => ("AVIONICS_MASTER_SET", Some(Number(0))),
        "FUEL_PUMP" => ("TOGGLE_ELECT_FUEL_PUMP", None),
        "CARB_HEAT_ON" => ("ANTI_ICE_SET", Some(Number(1))),
        "CARB_HEAT_OFF" => ("ANTI_ICE_SET", Some(Number(0))),
        "DE_ICE_TOGGLE" => ("TOGGLE_STRUCTURAL_DEICE", None),
        // Engine
        "ENGINE_PRIMER" => ("TOGGLE_PRIMER", None),
        "ENGINE_AUTOSTART" => ("ENGINE_AUTO_START", None),
        // Autopilot
        "AP_PANEL_VS_ON" => ("AP_PANEL_VS_SET", Some(Flag(true))),
        "AP_PANEL_VS_OFF" => ("AP_PANEL_VS_SET", Some(Flag(false))),
        "AP_PANEL_SPEED_ON" => ("AP_PANEL_SPEED_SET", Some(Flag(true))),
        "AP_PANEL_SPEED_OFF" => ("AP_PANEL_SPEED_SET", Some(Flag(false))),
        // Lights
        "TAXI_LIGHTS_TOGGLE" => ("TOGGLE_TAXI_LIGHTS", None),
        "NAV_LIGHTS_TOGGLE" => ("TOGGLE_NAV_LIGHTS", None),
        "BEACON_LIGHTS_TOGGLE" => ("TOGGLE_BEACON_LIGHTS", None),
        "CABIN_LIGHTS_TOGGLE" => ("TOGGLE_CABIN_LIGHTS", None),
        "LOGO_LIGHTS_TOGGLE" => ("TOGGLE_LOGO_LIGHTS", None),
        "RECOGNITION_LIGHTS_TOGGLE" => ("TOGGLE_RECOGNITION_LIGHTS", None),
        "INSTRUMENT_LIGHTS_TOGGLE" => ("TOGGLE_INSTRUMENT_LIGHTS", None),
        // Views
        "VIEW_NEXT" => ("NEXT_VIEW", None),
        "VIEW_PREVIOUS" => ("PREV_VIEW", None),
        "VIEW_VIRTUAL_COCKPIT" => ("VIEW_COCKPIT_FORWARD", None),
        "VIEW_SPOT" => ("VIEW_MODE", None),
        // Drone camera
        "CAMERA_DRONE_TOGGLE" => ("TOGGLE_DRONE_CAMERA", None),
        "CAMERA_DRONE_RESET" => ("DRONE_CAMERA_RESET", None),
        "CAMERA_DRONE_ATTACH" => ("DRONE_CAMERA_FOLLOW_SET", Some(Flag(true))),
        "CAMERA_DRONE_DETACH" => ("DRONE_CAMERA_FOLLOW_SET", Some(Flag(false))),
        "CAMERA_DRONE_LOCK_TOGGLE" => ("TOGGLE_DRONE_CAMERA_LOCK", None),
        _ => return None,
    };
    Some(mapped)
}
