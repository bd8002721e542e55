//! Geräteauswahl (GPU → CPU) und OpenCL-Sitzung (Kontext + Queue).

use crate::ClError;
use log::{debug, info, warn};
use opencl3::{
    command_queue::{CommandQueue, CL_QUEUE_PROFILING_ENABLE},
    context::Context,
    device::{Device, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU},
    error_codes::CL_DEVICE_NOT_FOUND,
    platform::{get_platforms, Platform},
    types::cl_device_type,
};
use std::fmt;

/// ICD-Loader meldet "keine Plattform" mit diesem Code statt einer leeren Liste.
const PLATFORM_NOT_FOUND_KHR: i32 = -1001;

/// Welche Geräteklasse gesucht wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DevicePreference {
    /// GPU if present, otherwise CPU
    #[default]
    Auto,
    Gpu,
    Cpu,
}

impl DevicePreference {
    fn search_order(self) -> &'static [DeviceKind] {
        match self {
            DevicePreference::Auto => &[DeviceKind::Gpu, DeviceKind::Cpu],
            DevicePreference::Gpu => &[DeviceKind::Gpu],
            DevicePreference::Cpu => &[DeviceKind::Cpu],
        }
    }

    fn wanted(self) -> &'static str {
        match self {
            DevicePreference::Auto => "GPU or CPU",
            DevicePreference::Gpu => "GPU",
            DevicePreference::Cpu => "CPU",
        }
    }
}

/// Tatsächlich gewählte Geräteklasse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Gpu,
    Cpu,
}

impl DeviceKind {
    fn cl_type(self) -> cl_device_type {
        match self {
            DeviceKind::Gpu => CL_DEVICE_TYPE_GPU,
            DeviceKind::Cpu => CL_DEVICE_TYPE_CPU,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceKind::Gpu => "GPU",
            DeviceKind::Cpu => "CPU",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SelectedDevice {
    pub device: Device,
    pub kind: DeviceKind,
    pub name: String,
    pub platform: String,
}

/// Erstes Gerät der Klasse `kind` über alle Plattformen.
fn first_device(
    platforms: &[Platform],
    kind: DeviceKind,
) -> Result<Option<(Device, String)>, ClError> {
    for platform in platforms {
        match platform.get_devices(kind.cl_type()) {
            Ok(ids) => {
                if let Some(&id) = ids.first() {
                    let name = platform.name().unwrap_or_default();
                    return Ok(Some((Device::new(id), name)));
                }
            }
            Err(e) if e.0 == CL_DEVICE_NOT_FOUND => {
                debug!("no {kind} device on platform {:?}", platform.name().ok());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(None)
}

/// Sucht ein Gerät gemäß `pref`. Bei `Auto` wird ohne GPU auf die CPU ausgewichen.
pub fn select_device(pref: DevicePreference) -> Result<SelectedDevice, ClError> {
    let platforms = match get_platforms() {
        Ok(p) => p,
        Err(e) if e.0 == PLATFORM_NOT_FOUND_KHR => return Err(ClError::NoPlatform),
        Err(e) => return Err(e.into()),
    };
    if platforms.is_empty() {
        return Err(ClError::NoPlatform);
    }
    debug!("{} OpenCL platform(s) available", platforms.len());

    for &kind in pref.search_order() {
        if let Some((device, platform)) = first_device(&platforms, kind)? {
            let name = device.name().unwrap_or_else(|_| String::from("<unnamed>"));
            info!("using {kind} device `{name}` on platform `{platform}`");
            return Ok(SelectedDevice { device, kind, name, platform });
        }
        if kind == DeviceKind::Gpu && pref == DevicePreference::Auto {
            warn!("GPU not found, falling back to CPU");
        }
    }

    Err(ClError::NoDevice { wanted: pref.wanted() })
}

// ─── Sitzung ─────────────────────────────────────────────────────────

/// Gerät, Kontext und Command-Queue einer Berechnung.
pub struct Session {
    selected: SelectedDevice,
    context: Context,
    queue: CommandQueue,
}

impl Session {
    pub fn open(pref: DevicePreference) -> Result<Self, ClError> {
        Self::with_device(select_device(pref)?)
    }

    pub fn with_device(selected: SelectedDevice) -> Result<Self, ClError> {
        let context = Context::from_device(&selected.device)?;
        debug!("context created for `{}`", selected.name);

        // clCreateCommandQueue läuft auch auf reinen 1.2-Treibern
        #[allow(deprecated)]
        let queue = CommandQueue::create_default(&context, CL_QUEUE_PROFILING_ENABLE)?;

        Ok(Self { selected, context, queue })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn device(&self) -> &SelectedDevice {
        &self.selected
    }

    pub fn kind(&self) -> DeviceKind {
        self.selected.kind
    }
}
