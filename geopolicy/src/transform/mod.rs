//! Coordinate transforms applied by the [`CrsReconciler`](crate::reconcile::CrsReconciler).

mod axis_swap;
mod reproject;

pub use axis_swap::{swap_axes, AxisSwap};
pub use reproject::Reprojection;
