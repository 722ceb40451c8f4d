//! Scene lights
//!
//! Lights are ordinary scene nodes. Point lights carry a position, a cutoff
//! distance and a decay exponent; ambient lights add a constant term to every
//! surface.

use cgmath::{Point3, Vector3};

use crate::gfx::color::Color;

/// Omnidirectional light located at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub name: String,
    pub color: Color,
    pub intensity: f32,
    /// Cutoff distance; `0` means unlimited range.
    pub distance: f32,
    pub decay: f32,
    pub cast_shadow: bool,
    pub position: Vector3<f32>,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            name: "PointLight".to_string(),
            color,
            intensity,
            distance: distance.max(0.0),
            decay,
            cast_shadow: false,
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
    }

    pub fn position_point(&self) -> Point3<f32> {
        Point3::new(self.position.x, self.position.y, self.position.z)
    }

    /// Color pre-multiplied by intensity, as uploaded to the shaders.
    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }

    /// Distance falloff at `d` units from the light, in `[0, 1]`.
    ///
    /// Must stay in sync with `distance_attenuation` in `scene.wgsl`.
    pub fn attenuation(&self, d: f32) -> f32 {
        if self.distance > 0.0 && self.decay > 0.0 {
            (1.0 - d / self.distance).clamp(0.0, 1.0).powf(self.decay)
        } else {
            1.0
        }
    }
}

/// Light applied uniformly to every surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub name: String,
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            name: "AmbientLight".to_string(),
            color,
            intensity,
        }
    }

    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point(PointLight),
    Ambient(AmbientLight),
}

impl Light {
    pub fn name(&self) -> &str {
        match self {
            Light::Point(light) => &light.name,
            Light::Ambient(light) => &light.name,
        }
    }

    pub fn cast_shadow(&self) -> bool {
        matches!(self, Light::Point(light) if light.cast_shadow)
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

impl From<AmbientLight> for Light {
    fn from(light: AmbientLight) -> Self {
        Light::Ambient(light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_decay_never_attenuates() {
        let light = PointLight::new(Color::WHITE, 1.2, 10_000.0, 0.0);
        assert_eq!(light.attenuation(0.0), 1.0);
        assert_eq!(light.attenuation(9_999.0), 1.0);
        assert_eq!(light.attenuation(50_000.0), 1.0);
    }

    #[test]
    fn zero_distance_means_unlimited_range() {
        let light = PointLight::new(Color::WHITE, 1.0, 0.0, 2.0);
        assert_eq!(light.attenuation(1.0e6), 1.0);
    }

    #[test]
    fn decay_falls_off_to_cutoff() {
        let light = PointLight::new(Color::WHITE, 1.0, 100.0, 2.0);
        assert_relative_eq!(light.attenuation(50.0), 0.25);
        assert_eq!(light.attenuation(100.0), 0.0);
        assert_eq!(light.attenuation(150.0), 0.0);
    }

    #[test]
    fn radiance_scales_color_by_intensity() {
        let light = AmbientLight::new(Color::WHITE, 0.2);
        assert_relative_eq!(light.radiance().g, 0.2);
    }

    #[test]
    fn only_point_lights_cast_shadows() {
        let mut point = PointLight::new(Color::WHITE, 1.0, 0.0, 0.0);
        point.cast_shadow = true;
        assert!(Light::from(point).cast_shadow());
        assert!(!Light::from(AmbientLight::new(Color::WHITE, 1.0)).cast_shadow());
    }
}
