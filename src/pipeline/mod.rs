//! Pipeline Module - Mounting, the render effect, and the instance registry.

pub mod mount;
pub mod registry;

pub use mount::{mount, watch_frames, MountHandle, MountOptions};
