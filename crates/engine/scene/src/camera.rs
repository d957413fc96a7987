//! Scene camera and fly controller
//!
//! The camera is plain view/projection math. `FlyCamera` steers it from
//! abstract inputs: spherical look angles plus per-axis movement intents.
//! Each frame's displacement is treated as a short ray and routed through
//! the portal pair, so walking into a portal comes out of the other side
//! with the view re-aimed.

use crate::portal::PortalPair;
use glam::{Mat4, Vec3};
use std::f32::consts::PI;
use tracing::debug;

/// Pinhole camera defined by eye position, look-at target and world up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    world_up: Vec3,
    fov_y: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(2.0, 2.0, 2.0),
            target: Vec3::ZERO,
            world_up: Vec3::Y,
            fov_y: 60.0_f32.to_radians(),
            aspect: 1.0,
            z_near: 0.01,
            z_far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, world_up: Vec3) -> Self {
        Self {
            eye,
            target,
            world_up,
            ..Self::default()
        }
    }

    pub fn set_view(&mut self, eye: Vec3, target: Vec3, world_up: Vec3) {
        self.eye = eye;
        self.target = target;
        self.world_up = world_up;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.world_up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Inverse view-projection, the uniform the ray-generation shader uses
    /// to unproject screen corners.
    pub fn inverse_view_proj(&self) -> Mat4 {
        self.view_proj().inverse()
    }
}

/// Fly controller: spherical look angles around a tracked center point.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    camera: Camera,
    /// Azimuth of the look direction, radians
    yaw: f32,
    /// Inclination from the up axis, radians, kept off the poles
    pitch: f32,
    /// Distance from the eye to the tracked center
    distance: f32,
    center: Vec3,
    speed: f32,
    move_forward: f32,
    move_right: f32,
    move_up: f32,
}

impl FlyCamera {
    /// Wrap a camera, deriving the spherical angles from its current view.
    pub fn new(camera: Camera) -> Self {
        let to_target = camera.target() - camera.eye();
        let distance = to_target.length().max(1e-4);
        let look = to_target / distance;

        Self {
            camera,
            yaw: look.z.atan2(look.x),
            pitch: look.y.clamp(-1.0, 1.0).acos(),
            distance,
            center: camera.target(),
            speed: 16.0,
            move_forward: 0.0,
            move_right: 0.0,
            move_up: 0.0,
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Movement intent along the camera's forward/right/up axes, each
    /// typically in [-1, 1].
    pub fn set_move_input(&mut self, forward: f32, right: f32, up: f32) {
        self.move_forward = forward;
        self.move_right = right;
        self.move_up = up;
    }

    /// Apply a mouse-look delta to the spherical angles.
    pub fn look_delta(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(0.01, PI - 0.01);
    }

    /// Move the eye toward or away from the tracked center.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).max(0.1);
    }

    fn look_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.sin(),
            self.pitch.cos(),
            self.yaw.sin() * self.pitch.sin(),
        )
    }

    /// Advance the camera by one frame.
    ///
    /// The displacement from the previous eye position is cast as a ray
    /// against `portals`; crossing one teleports the camera and re-aims the
    /// look direction through the pair's rotation. Returns true when the
    /// view changed.
    pub fn update(&mut self, delta_time: f32, portals: Option<&PortalPair>) -> bool {
        let look = self.look_direction();
        let mut eye = self.center - self.distance * look;
        let up = self.camera.world_up();
        let right = look.cross(up).normalize_or(Vec3::X);
        let forward = up.cross(right);

        let displacement =
            (self.move_forward * forward + self.move_right * right + self.move_up * up)
                * self.speed
                * delta_time;

        let previous_eye = self.camera.eye();
        let step = eye + displacement - previous_eye;
        let travel = step.length();

        let mut teleported = false;
        if travel > 0.0 {
            let direction = step / travel;
            if let Some(pair) = portals {
                if let Some(teleport) = pair.traverse(previous_eye, direction, travel) {
                    eye = teleport.position;
                    let new_look = teleport.rotation.transform_vector3(look).normalize();
                    self.center = eye + self.distance * new_look;
                    self.yaw = new_look.z.atan2(new_look.x);
                    self.pitch = new_look.y.clamp(-1.0, 1.0).acos();
                    teleported = true;
                    debug!(eye = ?eye, "camera teleported through portal");
                }
            }
        }

        if !teleported {
            eye += displacement;
            self.center += displacement;
        }

        if eye != self.camera.eye() || self.center != self.camera.target() {
            self.camera.set_view(eye, self.center, up);
            true
        } else {
            false
        }
    }
}
