//! Device Abstraction - Placement of Tensors and Modules
//!
//! Identifies where a tensor lives and where a module runs. axoncal ships
//! a single host backend, so every device is backed by host memory; the
//! device value is carried on each tensor so that relocations are explicit
//! and mixing placements inside one operation is rejected.
//!
//! # Example
//! ```rust
//! use axoncal_core::Device;
//!
//! let cpu: Device = "cpu".parse().unwrap();
//! assert!(cpu.is_cpu());
//!
//! let gpu: Device = "cuda:1".parse().unwrap();
//! assert_eq!(gpu, Device::Cuda(1));
//! assert_eq!(gpu.to_string(), "cuda:1");
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

// =============================================================================
// Device Enum
// =============================================================================

/// Represents a compute device where tensors are placed and modules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Host CPU device.
    #[default]
    Cpu,

    /// CUDA device with device index.
    Cuda(usize),
}

impl Device {
    /// Returns true if this is the host CPU device.
    #[must_use]
    pub const fn is_cpu(self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Returns true if this is an accelerator device.
    #[must_use]
    pub const fn is_gpu(self) -> bool {
        !self.is_cpu()
    }

    /// Returns the device index for accelerators, or 0 for CPU.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Cpu => 0,
            Self::Cuda(idx) => idx,
        }
    }

    /// Returns the name of this device type.
    #[must_use]
    pub const fn device_type(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda(_) => "cuda",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(idx) => write!(f, "cuda:{idx}"),
        }
    }
}

impl FromStr for Device {
    type Err = Error;

    /// Parses `cpu`, `cuda` (index 0) or `cuda:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, index) = match s.split_once(':') {
            Some((kind, index)) => (kind, Some(index)),
            None => (s, None),
        };

        match (kind.to_ascii_lowercase().as_str(), index) {
            ("cpu", None) => Ok(Self::Cpu),
            ("cuda", None) => Ok(Self::Cuda(0)),
            ("cuda", Some(idx)) => idx
                .parse::<usize>()
                .map(Self::Cuda)
                .map_err(|_| Error::invalid_device(s)),
            _ => Err(Error::invalid_device(s)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_device() {
        let device = Device::Cpu;
        assert!(device.is_cpu());
        assert!(!device.is_gpu());
        assert_eq!(device.device_type(), "cpu");
        assert_eq!(device.index(), 0);
    }

    #[test]
    fn test_device_default() {
        assert_eq!(Device::default(), Device::Cpu);
    }

    #[test]
    fn test_parse_devices() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
        assert_eq!("CUDA".parse::<Device>().unwrap(), Device::Cuda(0));
        assert_eq!("cuda:3".parse::<Device>().unwrap(), Device::Cuda(3));
        assert_eq!(" cuda:1 ".parse::<Device>().unwrap(), Device::Cuda(1));
    }

    #[test]
    fn test_parse_invalid_device() {
        assert!("tpu".parse::<Device>().is_err());
        assert!("cuda:x".parse::<Device>().is_err());
        assert!("cpu:0".parse::<Device>().is_err());
        assert!("".parse::<Device>().is_err());
    }

    #[test]
    fn test_device_display_roundtrip() {
        for device in [Device::Cpu, Device::Cuda(0), Device::Cuda(7)] {
            assert_eq!(device.to_string().parse::<Device>().unwrap(), device);
        }
    }
}
