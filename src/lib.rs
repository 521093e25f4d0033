//! APM - Android Project Manager
//!
//! Sets up the Android SDK needed to build applications on the device
//! itself: native tools, build tools, the platform framework, the time
//! zone database and project assets.
//!
//! ## Architecture
//!
//! APM is organized into specialized crates:
//!
//! - `apm-core`: Configuration and the installed SDK version marker
//! - `apm-android-toolchain`: Manifest resolution, download, verification
//!   and installation of the SDK

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use apm_android_toolchain as toolchain;
pub use apm_core as core;
