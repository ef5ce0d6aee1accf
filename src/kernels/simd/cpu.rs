//! Runtime CPU feature detection, resolved once per process.

use std::fmt;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug)]
pub struct SimdCapabilities {
    pub arch: &'static str,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,
    pub neon: bool,
    pub lane_width_bits: usize,
}

impl SimdCapabilities {
    pub fn feature_level(&self) -> &'static str {
        if self.avx2 {
            "avx2"
        } else if self.avx {
            "avx"
        } else if self.neon {
            "neon"
        } else {
            "scalar"
        }
    }
}

impl fmt::Display for SimdCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (lane={}b, fma={})",
            self.arch,
            self.feature_level(),
            self.lane_width_bits,
            self.fma
        )
    }
}

static CAPABILITIES: OnceLock<SimdCapabilities> = OnceLock::new();

pub fn capabilities() -> &'static SimdCapabilities {
    CAPABILITIES.get_or_init(detect)
}

#[cfg(target_arch = "x86_64")]
fn detect() -> SimdCapabilities {
    let avx = std::arch::is_x86_feature_detected!("avx");
    let avx2 = std::arch::is_x86_feature_detected!("avx2");
    SimdCapabilities {
        arch: "x86_64",
        avx,
        avx2,
        fma: std::arch::is_x86_feature_detected!("fma"),
        neon: false,
        lane_width_bits: if avx { 256 } else { 128 },
    }
}

#[cfg(target_arch = "aarch64")]
fn detect() -> SimdCapabilities {
    SimdCapabilities {
        arch: "aarch64",
        avx: false,
        avx2: false,
        fma: true,
        neon: std::arch::is_aarch64_feature_detected!("neon"),
        lane_width_bits: 128,
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> SimdCapabilities {
    SimdCapabilities {
        arch: "generic",
        avx: false,
        avx2: false,
        fma: false,
        neon: false,
        lane_width_bits: 64,
    }
}
