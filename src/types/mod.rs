// groupshelf shared type definitions
// Each submodule defines types used across both popup features.

pub mod errors;
pub mod group;
pub mod interaction;
pub mod settings;
pub mod tab;
pub mod view;
