//! Common test utilities for bing-wallpaper integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mocks::*;
