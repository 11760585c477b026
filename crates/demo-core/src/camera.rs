//! Orbit camera over spherical coordinates.
//!
//! The camera circles a target point at `distance`, with `theta` the
//! horizontal angle and `phi` the elevation (Y-up). Pointer input mutates
//! the state through explicit methods; matrix derivation is a read-only
//! query run once per frame.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

pub const MIN_DISTANCE: f32 = 50.0;
pub const MAX_DISTANCE: f32 = 2000.0;

// Keep phi strictly inside +-pi/2 so the look-at up vector never degenerates.
pub const PHI_MARGIN: f32 = 0.01;
pub const MIN_PHI: f32 = -FRAC_PI_2 + PHI_MARGIN;
pub const MAX_PHI: f32 = FRAC_PI_2 - PHI_MARGIN;

/// Radians of rotation per pixel of drag.
pub const ROTATE_SENSITIVITY: f32 = 0.005;
/// Pan speed per pixel is this factor times the current distance, so the
/// apparent screen-space motion stays constant across zoom levels.
pub const PAN_DISTANCE_FACTOR: f32 = 0.002;
/// Each wheel notch moves the distance by this fraction of itself.
pub const ZOOM_STEP: f32 = 0.1;

pub const FOV_Y: f32 = FRAC_PI_4;
pub const Z_NEAR: f32 = 1.0;
pub const Z_FAR: f32 = 5000.0;

/// Spherical camera state. `theta` is unbounded (wrapped implicitly by the
/// trig functions); `distance` and `phi` are clamped by every mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub distance: f32,
    pub theta: f32,
    pub phi: f32,
    pub target: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            distance: 500.0,
            theta: FRAC_PI_4,
            phi: FRAC_PI_6,
            target: Vec3::ZERO,
        }
    }
}

/// Active pointer-drag mode. At most one mode is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    None,
    Rotate,
    Pan,
}

impl DragMode {
    /// Map a pointer-down to a drag mode: secondary button or
    /// primary+shift pans, plain primary rotates, anything else is inert.
    pub fn from_pointer(button: i16, shift: bool) -> Self {
        if button == 2 || shift {
            DragMode::Pan
        } else if button == 0 {
            DragMode::Rotate
        } else {
            DragMode::None
        }
    }
}

/// Matrices derived from the camera state, recomputed every frame.
/// Column-major, right-handed, Y-up.
#[derive(Clone, Copy, Debug)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub position: Vec3,
}

pub struct OrbitCamera {
    state: CameraState,
    mode: DragMode,
    last_x: f32,
    last_y: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::with_state(CameraState::default())
    }

    pub fn with_state(state: CameraState) -> Self {
        Self {
            state: clamped(state),
            mode: DragMode::None,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn set_state(&mut self, state: CameraState) {
        self.state = clamped(state);
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Restore the default state. Bound to double-click and the reset
    /// button; any in-flight drag is cancelled.
    pub fn reset(&mut self) {
        self.state = CameraState::default();
        self.mode = DragMode::None;
    }

    pub fn begin_drag(&mut self, x: f32, y: f32, mode: DragMode) {
        self.last_x = x;
        self.last_y = y;
        self.mode = mode;
    }

    pub fn end_drag(&mut self) {
        self.mode = DragMode::None;
    }

    /// Advance the active drag to a new pointer position.
    pub fn drag_to(&mut self, x: f32, y: f32) {
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        self.last_x = x;
        self.last_y = y;

        match self.mode {
            DragMode::Rotate => {
                self.state.theta -= dx * ROTATE_SENSITIVITY;
                self.state.phi =
                    (self.state.phi + dy * ROTATE_SENSITIVITY).clamp(MIN_PHI, MAX_PHI);
            }
            DragMode::Pan => {
                let (sin_t, cos_t) = self.state.theta.sin_cos();
                let (sin_p, cos_p) = self.state.phi.sin_cos();
                // Camera-local basis. `right` is horizontal by construction
                // (no Y component), so the vertical pan term is up.y * dy.
                let right = Vec3::new(sin_t, 0.0, -cos_t);
                let up = Vec3::new(-sin_p * cos_t, cos_p, -sin_p * sin_t);
                let pan_speed = self.state.distance * PAN_DISTANCE_FACTOR;
                self.state.target += (right * dx + up * dy) * pan_speed;
            }
            DragMode::None => {}
        }
    }

    /// Exponential-feel zoom: the step scales with the current distance.
    /// Only the sign of `delta_y` matters; a zero delta is a no-op.
    pub fn zoom(&mut self, delta_y: f32) {
        let step = self.state.distance * ZOOM_STEP;
        if delta_y > 0.0 {
            self.state.distance += step;
        } else if delta_y < 0.0 {
            self.state.distance -= step;
        }
        self.state.distance = self.state.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// World-space eye position from the spherical coordinates (Y-up).
    pub fn eye_position(&self) -> Vec3 {
        let s = &self.state;
        let (sin_t, cos_t) = s.theta.sin_cos();
        let (sin_p, cos_p) = s.phi.sin_cos();
        s.target + s.distance * Vec3::new(cos_p * cos_t, sin_p, cos_p * sin_t)
    }

    /// Derive the per-frame matrices. `aspect` must come from the live
    /// canvas pixel dimensions since the canvas may resize between frames.
    ///
    /// The projection uses the GL-style clip convention
    /// (`m[2][2] = (n+f)/(n-f)`, `m[3][2] = 2nf/(n-f)`), matching the
    /// shaders. Eye and target can never coincide: distance is clamped to a
    /// positive minimum and phi stays away from the poles, so the look-at
    /// basis is always well defined.
    pub fn matrices(&self, aspect: f32) -> CameraMatrices {
        let position = self.eye_position();
        let view = Mat4::look_at_rh(position, self.state.target, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(FOV_Y, aspect, Z_NEAR, Z_FAR);
        CameraMatrices {
            view,
            projection,
            view_projection: projection * view,
            position,
        }
    }
}

fn clamped(mut state: CameraState) -> CameraState {
    state.distance = state.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    state.phi = state.phi.clamp(MIN_PHI, MAX_PHI);
    state
}
