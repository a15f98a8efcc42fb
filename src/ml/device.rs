// ============================================================
// Layer 5 — Device Selection
// ============================================================
// Decides where evaluation runs from the configured number of
// accelerators and what the machine actually has.
//
// Asking for more accelerators than exist is not an error:
// the request is lowered to what is available (possibly CPU)
// and a warning is logged.
//
// Backend:
//   feature "wgpu" (default) → burn::backend::Wgpu; every non-CPU
//                              adapter wgpu can see counts as an
//                              accelerator
//   without it               → burn::backend::NdArray, CPU only

use burn::prelude::Backend;

#[cfg(feature = "wgpu")]
pub type EvalBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type EvalBackend = burn::backend::NdArray;

pub type EvalDevice = <EvalBackend as Backend>::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    /// Accelerator by index
    Accelerator(usize),
}

/// Result of the negotiation: the primary device, the ids of
/// every accelerator granted and the downgrade warnings that
/// were logged on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePlan {
    pub kind:       DeviceKind,
    pub device_ids: Vec<usize>,
    pub warnings:   Vec<String>,
}

impl DevicePlan {
    pub fn accelerator_count(&self) -> usize {
        self.device_ids.len()
    }
}

/// Number of accelerators this build can drive on this machine.
#[cfg(feature = "wgpu")]
pub fn available_accelerators() -> usize {
    let adapters = wgpu::Instance::default().enumerate_adapters(wgpu::Backends::all());
    count_accelerators(adapters.iter().map(|a| a.get_info().device_type))
}

#[cfg(not(feature = "wgpu"))]
pub fn available_accelerators() -> usize {
    0
}

/// Software adapters (llvmpipe, WARP) report `Cpu` and are not counted.
#[cfg(feature = "wgpu")]
fn count_accelerators(device_types: impl IntoIterator<Item = wgpu::DeviceType>) -> usize {
    device_types
        .into_iter()
        .filter(|t| *t != wgpu::DeviceType::Cpu)
        .count()
}

/// Lower `requested` to what is `available`, warning on every
/// downgrade.
pub fn prepare_device(requested: usize, available: usize) -> DevicePlan {
    let mut n_use = requested;
    let mut warnings = Vec::new();

    if n_use > 0 && available == 0 {
        warnings.push(
            "No accelerator available on this machine, evaluation will be performed on CPU"
                .to_string(),
        );
        n_use = 0;
    }
    if n_use > available {
        warnings.push(format!(
            "The number of accelerators configured to use is {}, but only {} are available",
            n_use, available
        ));
        n_use = available;
    }
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let kind = if n_use > 0 { DeviceKind::Accelerator(0) } else { DeviceKind::Cpu };
    DevicePlan { kind, device_ids: (0..n_use).collect(), warnings }
}

/// Map a plan onto a concrete backend device.
pub fn to_backend_device(plan: &DevicePlan) -> EvalDevice {
    // TODO: split batches across every id in plan.device_ids instead of using the first one only
    if plan.accelerator_count() > 1 {
        tracing::warn!(
            "Multi-device evaluation is not supported, using accelerator 0 of {}",
            plan.accelerator_count()
        );
    }
    backend_device(plan.kind)
}

#[cfg(feature = "wgpu")]
fn backend_device(kind: DeviceKind) -> EvalDevice {
    use burn::backend::wgpu::WgpuDevice;
    match kind {
        DeviceKind::Accelerator(_) => WgpuDevice::DefaultDevice,
        DeviceKind::Cpu => WgpuDevice::Cpu,
    }
}

#[cfg(not(feature = "wgpu"))]
fn backend_device(_kind: DeviceKind) -> EvalDevice {
    burn::backend::ndarray::NdArrayDevice::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_within_availability_is_kept() {
        let plan = prepare_device(2, 4);
        assert_eq!(plan.kind, DeviceKind::Accelerator(0));
        assert_eq!(plan.device_ids, vec![0, 1]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_request_above_availability_is_lowered() {
        let plan = prepare_device(8, 2);
        assert_eq!(plan.accelerator_count(), 2);
        assert_eq!(plan.kind, DeviceKind::Accelerator(0));
        assert_eq!(
            plan.warnings,
            vec!["The number of accelerators configured to use is 8, but only 2 are available"]
        );
    }

    #[test]
    fn test_no_accelerator_falls_back_to_cpu() {
        let plan = prepare_device(1, 0);
        assert_eq!(plan.kind, DeviceKind::Cpu);
        assert!(plan.device_ids.is_empty());
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].contains("performed on CPU"));
    }

    #[test]
    fn test_zero_requested_is_cpu() {
        let plan = prepare_device(0, 3);
        assert_eq!(plan.kind, DeviceKind::Cpu);
        assert!(plan.warnings.is_empty());
    }

    #[cfg(feature = "wgpu")]
    #[test]
    fn test_software_adapters_are_not_accelerators() {
        use wgpu::DeviceType;
        assert_eq!(count_accelerators([DeviceType::Cpu]), 0);
        assert_eq!(prepare_device(1, count_accelerators([DeviceType::Cpu])).kind, DeviceKind::Cpu);
        assert_eq!(
            count_accelerators([DeviceType::DiscreteGpu, DeviceType::Cpu, DeviceType::IntegratedGpu]),
            2
        );
    }

    #[cfg(not(feature = "wgpu"))]
    #[test]
    fn test_cpu_build_has_no_accelerator() {
        assert_eq!(available_accelerators(), 0);
    }
}
