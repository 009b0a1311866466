//! GPU vendor detection and hardware encoder selection

use std::fmt;
use tracing::debug;

use super::core::new_command;

// ============================================================================
// GPU Vendor
// ============================================================================

/// Detected GPU vendor. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Unknown,
    #[default]
    None,
}

impl GpuVendor {
    pub const ALL: [GpuVendor; 4] = [Self::Nvidia, Self::Amd, Self::Unknown, Self::None];

    /// Tag stored in the config file and shown in the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nvidia => "NVIDIA",
            Self::Amd => "AMD",
            Self::Unknown => "Unknown",
            Self::None => "None",
        }
    }

    /// Parse a stored tag. Anything unrecognized (including "") is `None`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "NVIDIA" => Self::Nvidia,
            "AMD" => Self::Amd,
            "Unknown" => Self::Unknown,
            _ => Self::None,
        }
    }

    /// Classify a device name reported by the GPU enumeration
    pub fn classify(device_name: &str) -> Self {
        if device_name.contains("NVIDIA") {
            Self::Nvidia
        } else if device_name.contains("AMD") || device_name.contains("Radeon") {
            Self::Amd
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of GPU detection: vendor tag plus a human readable device name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    pub vendor: GpuVendor,
    pub name: String,
}

impl GpuInfo {
    pub fn none() -> Self {
        Self {
            vendor: GpuVendor::None,
            name: "None".to_string(),
        }
    }

    /// "NVIDIA - NVIDIA GeForce RTX 3080"
    pub fn label(&self) -> String {
        format!("{} - {}", self.vendor, self.name)
    }
}

impl Default for GpuInfo {
    fn default() -> Self {
        Self::none()
    }
}

// ============================================================================
// Video Encoder Selection
// ============================================================================

/// Hardware H.264 encoders this tool knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    H264Nvenc, // NVIDIA NVENC
    H264Amf,   // AMD AMF
}

impl Encoder {
    /// Encoder for a vendor. `None` means the hardware is unsupported
    /// and the job must be refused.
    pub fn for_vendor(vendor: GpuVendor) -> Option<Self> {
        match vendor {
            GpuVendor::Nvidia => Some(Self::H264Nvenc),
            GpuVendor::Amd => Some(Self::H264Amf),
            GpuVendor::Unknown | GpuVendor::None => None,
        }
    }

    /// Get the FFmpeg encoder name
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::H264Nvenc => "h264_nvenc",
            Self::H264Amf => "h264_amf",
        }
    }

    /// Encoder-specific options placed right after `-c:v <encoder>`
    pub fn extra_args(&self) -> &'static [&'static str] {
        match self {
            // NVENC rejects some 10-bit/4:4:4 sources, force 4:2:0 planar
            Self::H264Nvenc => &["-pix_fmt", "yuv420p"],
            Self::H264Amf => &[],
        }
    }

    /// Get user-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::H264Nvenc => "H.264 NVENC (NVIDIA)",
            Self::H264Amf => "H.264 AMF (AMD)",
        }
    }
}

// ============================================================================
// Detection
// ============================================================================

/// One enumerated GPU device
#[derive(Debug, Clone, PartialEq)]
pub struct GpuDevice {
    pub name: String,
    pub memory_total_mb: f64,
}

/// Parse `nvidia-smi --query-gpu=name,memory.total --format=csv,noheader,nounits`
pub fn parse_device_csv(stdout: &str) -> Vec<GpuDevice> {
    stdout
        .lines()
        .filter_map(|line| {
            let (name, memory) = line.rsplit_once(',')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(GpuDevice {
                name: name.to_string(),
                memory_total_mb: memory.trim().parse().unwrap_or(0.0),
            })
        })
        .collect()
}

/// The device with the most memory is treated as the primary GPU
pub fn select_primary(devices: &[GpuDevice]) -> Option<&GpuDevice> {
    devices
        .iter()
        .max_by(|a, b| a.memory_total_mb.total_cmp(&b.memory_total_mb))
}

/// Find an AMD adapter in an OS hardware listing and return its short name.
///
/// Only AMD is recognized here: a machine whose NVIDIA card is invisible to
/// the device enumeration stays undetected.
pub fn find_amd_in_listing<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<String> {
    for line in lines {
        if line.contains("AMD") || line.contains("Radeon") {
            // lspci prefixes the slot and class: "03:00.0 VGA compatible controller: ..."
            let description = line.split_once(": ").map(|(_, d)| d).unwrap_or(line);
            let name = description
                .replace("AMD ", "")
                .replace("Radeon ", "")
                .trim()
                .to_string();
            return Some(name);
        }
    }
    None
}

/// Combine the enumeration result with the OS fallback into a `GpuInfo`
pub fn identify(devices: &[GpuDevice], fallback: impl FnOnce() -> Option<String>) -> GpuInfo {
    if let Some(primary) = select_primary(devices) {
        return GpuInfo {
            vendor: GpuVendor::classify(&primary.name),
            name: primary.name.clone(),
        };
    }

    match fallback() {
        Some(name) => GpuInfo {
            vendor: GpuVendor::Amd,
            name,
        },
        None => GpuInfo::none(),
    }
}

/// Enumerate GPUs with their memory sizes via nvidia-smi
pub fn enumerate_devices() -> Vec<GpuDevice> {
    let output = new_command("nvidia-smi")
        .args([
            "--query-gpu=name,memory.total",
            "--format=csv,noheader,nounits",
        ])
        .output();

    match output {
        Ok(out) if out.status.success() => parse_device_csv(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            debug!("nvidia-smi exited with {}", out.status);
            Vec::new()
        }
        Err(e) => {
            debug!("nvidia-smi unavailable: {}", e);
            Vec::new()
        }
    }
}

#[cfg(windows)]
fn os_adapter_listing() -> Option<String> {
    let output = new_command("wmic")
        .args(["path", "win32_videocontroller", "get", "description"])
        .output()
        .ok()?;
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(not(windows))]
fn os_adapter_listing() -> Option<String> {
    let output = new_command("lspci").output().ok()?;
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

/// OS-level fallback restricted to AMD adapters
fn detect_amd_fallback() -> Option<String> {
    let listing = os_adapter_listing()?;

    if cfg!(windows) {
        // First wmic line is the "Description" header
        find_amd_in_listing(listing.trim().lines().skip(1))
    } else {
        find_amd_in_listing(listing.lines().filter(|line| is_lspci_display_line(line)))
    }
}

/// True when an lspci line's device class is a display adapter.
/// The class sits between the slot and the first ": ".
fn is_lspci_display_line(line: &str) -> bool {
    let Some((_slot, rest)) = line.split_once(' ') else {
        return false;
    };
    let Some((class, _)) = rest.split_once(": ") else {
        return false;
    };
    matches!(
        class,
        "VGA compatible controller" | "Display controller" | "3D controller"
    )
}

/// Detect the primary GPU vendor and model
pub fn detect_gpu() -> GpuInfo {
    let devices = enumerate_devices();
    let info = identify(&devices, detect_amd_fallback);
    debug!(vendor = %info.vendor, name = %info.name, "GPU detection finished");
    info
}
