//! Camera projection
//!
//! Pure reads of the flight state. Nothing here mutates the simulation; the
//! frame loop calls [`project`] after physics has settled.

use glam::Vec2;

use crate::consts::CULL_MARGIN;
use crate::sim::{BodyIndex, Catalog, FlightState, Ship};

/// Screen size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// World-to-screen affine transform (uniform scale + translation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub offset: Vec2,
    pub zoom: f32,
}

impl ViewTransform {
    /// Keep `focus` centered; shed zoom as warp rises for a wider view
    pub fn follow(focus: Vec2, zoom: f32, warp: f32, warp_zoom_out: f32, viewport: Viewport) -> Self {
        let zoom = zoom * (1.0 - warp.clamp(0.0, 1.0) * warp_zoom_out);
        Self {
            offset: viewport.center() - focus * zoom,
            zoom,
        }
    }

    #[inline]
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.zoom + self.offset
    }

    /// CSS transform for the world container
    pub fn css_transform(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) scale({})",
            self.offset.x, self.offset.y, self.zoom
        )
    }
}

/// Ship sprite styling: warp shifts hue, brightens and adds a cyan glow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipSprite {
    pub position: Vec2,
    /// Sprite art points up, so heading + 90
    pub rotation_deg: f32,
    pub hue_shift_deg: f32,
    pub brightness: f32,
    pub glow_px: f32,
    pub glow_alpha: f32,
}

impl ShipSprite {
    pub fn new(ship: &Ship, warp: f32) -> Self {
        let warp = warp.clamp(0.0, 1.0);
        Self {
            position: ship.position,
            rotation_deg: ship.heading + 90.0,
            hue_shift_deg: warp * 180.0,
            brightness: 1.0 + warp * 1.5,
            glow_px: warp * 20.0,
            glow_alpha: warp,
        }
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) translate(-50%, -50%) rotate({}deg)",
            self.position.x, self.position.y, self.rotation_deg
        )
    }

    pub fn css_filter(&self) -> String {
        format!(
            "hue-rotate({}deg) brightness({}) drop-shadow(0 0 {}px rgba(0,255,255,{}))",
            self.hue_shift_deg, self.brightness, self.glow_px, self.glow_alpha
        )
    }
}

/// Bodies inside the viewport plus a zoom-scaled margin
pub fn visible_bodies(catalog: &Catalog, center: Vec2, zoom: f32, viewport: Viewport) -> Vec<BodyIndex> {
    let zoom = zoom.max(f32::EPSILON);
    let margin = CULL_MARGIN / zoom;
    let half = Vec2::new(viewport.width, viewport.height) * 0.5 / zoom + Vec2::splat(margin);
    let min = center - half;
    let max = center + half;
    catalog
        .iter()
        .filter(|(_, b)| {
            let p = b.position;
            p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
        })
        .map(|(i, _)| i)
        .collect()
}

/// Everything the hot render path needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub view: ViewTransform,
    pub ship: ShipSprite,
    pub warp: f32,
}

/// Project the current flight state
pub fn project(state: &FlightState, viewport: Viewport) -> SceneFrame {
    let warp = state.warp_intensity();
    SceneFrame {
        view: ViewTransform::follow(
            state.ship.position,
            state.zoom(),
            warp,
            state.tuning.warp_zoom_out,
            viewport,
        ),
        ship: ShipSprite::new(&state.ship, warp),
        warp,
    }
}
