//! The audio output seam.
//!
//! `MediaDevice` is what the playback controller drives; `RodioDevice` is the
//! real implementation. Sources are addressed by URL, resolved through a
//! `SourceResolver`.

mod device;
mod resolve;
mod tap;
mod types;

pub use device::RodioDevice;
pub use resolve::SourceResolver;
pub use tap::{AnalysisTap, TapSource, TAP_CAPACITY};
pub use types::{DeviceError, DeviceEvent, MediaDevice, SubscriptionId, Subscribers};
