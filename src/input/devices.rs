//! Keyboard input via Linux evdev.
//!
//! Each keyboard device gets a reader task on the tokio runtime that
//! translates key events and pushes them into the shared [`KeySender`].
//! Devices are read passively (not grabbed), so typing still reaches
//! other applications.

use std::path::{Path, PathBuf};

use evdev::{Device, InputEventKind, Key};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::linux_keys::key_event;
use super::{InputError, KeySender};

/// An opened keyboard device.
pub struct Keyboard {
    pub path: PathBuf,
    pub name: String,
    device: Device,
}

impl std::fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyboard")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish()
    }
}

/// Devices that report letter and Enter keys; mice, power buttons and
/// media remotes also expose EV_KEY but not these.
fn is_keyboard(device: &Device) -> bool {
    device.supported_keys().is_some_and(|keys| {
        keys.contains(Key::KEY_A) && keys.contains(Key::KEY_Z) && keys.contains(Key::KEY_ENTER)
    })
}

fn device_name(device: &Device) -> String {
    device.name().unwrap_or("Unknown").to_string()
}

/// Find all readable keyboards under `/dev/input`.
pub fn list_keyboards() -> Vec<Keyboard> {
    let mut keyboards: Vec<Keyboard> = evdev::enumerate()
        .filter(|(_, device)| is_keyboard(device))
        .map(|(path, device)| Keyboard {
            name: device_name(&device),
            path,
            device,
        })
        .collect();
    keyboards.sort_by(|a, b| a.path.cmp(&b.path));
    for kb in &keyboards {
        debug!("Found keyboard {} at {}", kb.name, kb.path.display());
    }
    keyboards
}

/// Open a specific device and check that it is a keyboard.
pub fn open_keyboard(path: &Path) -> Result<Keyboard, InputError> {
    let device = Device::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if !is_keyboard(&device) {
        return Err(InputError::NotAKeyboard {
            path: path.to_path_buf(),
        });
    }
    Ok(Keyboard {
        name: device_name(&device),
        path: path.to_path_buf(),
        device,
    })
}

/// Open the configured devices, or every detected keyboard when none are given.
pub fn open_keyboards(paths: &[PathBuf]) -> Result<Vec<Keyboard>, InputError> {
    let keyboards = if paths.is_empty() {
        list_keyboards()
    } else {
        paths
            .iter()
            .map(|p| open_keyboard(p))
            .collect::<Result<Vec<_>, _>>()?
    };
    if keyboards.is_empty() {
        return Err(InputError::NoKeyboards);
    }
    Ok(keyboards)
}

/// Start one reader task per keyboard. Must be called inside a tokio runtime.
pub fn spawn_readers(keyboards: Vec<Keyboard>, sender: KeySender) -> Vec<JoinHandle<()>> {
    keyboards
        .into_iter()
        .map(|kb| {
            info!("Listening on {} ({})", kb.name, kb.path.display());
            tokio::spawn(read_keyboard(kb, sender.clone()))
        })
        .collect()
}

async fn read_keyboard(kb: Keyboard, sender: KeySender) {
    let Keyboard { path, device, .. } = kb;
    let mut events = match device.into_event_stream() {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Cannot stream events from {}: {}", path.display(), e);
            return;
        }
    };

    loop {
        match events.next_event().await {
            Ok(ev) => {
                if let InputEventKind::Key(key) = ev.kind() {
                    if let Some(event) = key_event(key, ev.value()) {
                        sender.send(event);
                    }
                }
            }
            Err(e) => {
                // Typically ENODEV after unplug
                warn!("Stopped reading {}: {}", path.display(), e);
                return;
            }
        }
    }
}
