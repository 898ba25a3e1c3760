//! Binary image loading.

pub mod loader;
