use std::sync::atomic::{AtomicUsize, Ordering};

use geo_types::{coord, Geometry, LineString};

use crate::kernel::{GeoKernel, GeometryKernel, KernelError, RelatePattern};

/// Line string with `n` coordinates along the equator.
pub fn line(n: usize) -> LineString<f64> {
    (0..n).map(|i| coord! { x: i as f64, y: 0.0 }).collect()
}

/// Prints log records of the tested code when run with `RUST_LOG` set.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Kernel that delegates to [`GeoKernel`] and counts reprojections.
pub struct RecordingKernel {
    inner: GeoKernel,
    reprojections: AtomicUsize,
}

impl Default for RecordingKernel {
    fn default() -> Self {
        init_logger();
        Self {
            inner: GeoKernel::new(),
            reprojections: AtomicUsize::new(0),
        }
    }
}

impl RecordingKernel {
    pub fn reprojections(&self) -> usize {
        self.reprojections.load(Ordering::Relaxed)
    }
}

impl GeometryKernel for RecordingKernel {
    fn length(&self, geometry: &Geometry<f64>) -> f64 {
        self.inner.length(geometry)
    }

    fn area(&self, geometry: &Geometry<f64>) -> f64 {
        self.inner.area(geometry)
    }

    fn dimension(&self, geometry: &Geometry<f64>) -> i64 {
        self.inner.dimension(geometry)
    }

    fn geometry_type(&self, geometry: &Geometry<f64>) -> &'static str {
        self.inner.geometry_type(geometry)
    }

    fn is_simple(&self, geometry: &Geometry<f64>) -> bool {
        self.inner.is_simple(geometry)
    }

    fn is_empty(&self, geometry: &Geometry<f64>) -> bool {
        self.inner.is_empty(geometry)
    }

    fn distance(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> Result<f64, KernelError> {
        self.inner.distance(a, b)
    }

    fn relate(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
        pattern: &RelatePattern,
    ) -> Result<bool, KernelError> {
        self.inner.relate(a, b, pattern)
    }

    fn reproject(
        &self,
        geometry: &mut Geometry<f64>,
        from: u32,
        to: u32,
    ) -> Result<(), KernelError> {
        self.reprojections.fetch_add(1, Ordering::Relaxed);
        self.inner.reproject(geometry, from, to)
    }
}
