//! Scene navigation: camera math and portal teleportation
//!
//! The renderer ray-traces from a camera whose movement can cross a linked
//! portal pair; crossing one carries position, travel direction and look
//! direction through to the other side. Windowing and input events stay
//! outside this crate - the controller consumes abstract move and look
//! deltas.
//!
//! # Modules
//!
//! - [`camera`]: view/projection math and the fly controller
//! - [`portal`]: portal planes, rectangle-clipped ray tests, pair traversal

pub mod camera;
pub mod portal;

pub use camera::{Camera, FlyCamera};
pub use portal::{Portal, PortalPair, Teleport};
