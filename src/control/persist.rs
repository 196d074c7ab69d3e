//! Control state persistence.
//!
//! Layout in the key-value store (namespace `Relay_State`):
//!
//! | Key       | Encoding        | Default |
//! |-----------|-----------------|---------|
//! | `setTemp` | f32 little-end. | 25.0    |
//! | `Mode`    | 1 byte, 1=Auto  | Auto    |
//! | `Cooler`  | 1 byte, 1=on    | off     |
//!
//! Loading never fails: a missing, short or unreadable key falls back to
//! its default, and a stored setpoint outside the configured bounds is
//! replaced by the configured default.

use log::{info, warn};

use super::state::{ControlState, Mode};
use crate::app::ports::{StorageError, StoragePort};
use crate::config::SystemConfig;

pub const NAMESPACE: &str = "Relay_State";
pub const KEY_SETPOINT: &str = "setTemp";
pub const KEY_MODE: &str = "Mode";
pub const KEY_COOLER: &str = "Cooler";

/// Restore the control state, substituting defaults key by key.
pub fn load_state(store: &impl StoragePort, config: &SystemConfig) -> ControlState {
    let setpoint = match read_f32(store, KEY_SETPOINT) {
        Some(sp) if sp.is_finite() && (config.setpoint_min_c..=config.setpoint_max_c).contains(&sp) => sp,
        Some(sp) => {
            warn!(
                "Persist: stored setpoint {} outside {}..={}, using {}",
                sp, config.setpoint_min_c, config.setpoint_max_c, config.default_setpoint_c
            );
            config.default_setpoint_c
        }
        None => config.default_setpoint_c,
    };
    let mode = read_bool(store, KEY_MODE)
        .map(Mode::from_auto_flag)
        .unwrap_or(Mode::Auto);
    let cooler_on = read_bool(store, KEY_COOLER).unwrap_or(false);

    let state = ControlState {
        setpoint,
        mode,
        cooler_on,
    };
    info!(
        "Persist: loaded setpoint={:.1} mode={:?} cooler={}",
        state.setpoint, state.mode, state.cooler_on
    );
    state
}

/// Write all three keys. Stops at the first failing key.
pub fn save_state(store: &mut impl StoragePort, state: &ControlState) -> Result<(), StorageError> {
    store.write(NAMESPACE, KEY_SETPOINT, &state.setpoint.to_le_bytes())?;
    store.write(NAMESPACE, KEY_MODE, &[u8::from(state.mode.is_auto())])?;
    store.write(NAMESPACE, KEY_COOLER, &[u8::from(state.cooler_on)])?;
    Ok(())
}

fn read_f32(store: &impl StoragePort, key: &str) -> Option<f32> {
    let mut buf = [0u8; 4];
    match store.read(NAMESPACE, key, &mut buf) {
        Ok(4) => Some(f32::from_le_bytes(buf)),
        Ok(n) => {
            warn!("Persist: {} has {} bytes, expected 4", key, n);
            None
        }
        Err(StorageError::NotFound) => None,
        Err(e) => {
            warn!("Persist: reading {} failed: {}", key, e);
            None
        }
    }
}

fn read_bool(store: &impl StoragePort, key: &str) -> Option<bool> {
    let mut buf = [0u8; 1];
    match store.read(NAMESPACE, key, &mut buf) {
        Ok(1) => Some(buf[0] != 0),
        Ok(_) => None,
        Err(StorageError::NotFound) => None,
        Err(e) => {
            warn!("Persist: reading {} failed: {}", key, e);
            None
        }
    }
}
