/// Flat per-face shading: a two-tone ramp between darkened and whitened base color
use std::fmt;
use std::str::FromStr;

use crate::error::{ensure_finite, ShapeError, ShapeResult};
use crate::transform::Normal;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const NAVY: Rgb = Rgb::new(0, 0, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Perceived brightness in `[0, 1]`.
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    fn map(self, f: impl Fn(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

/// CSS notation, e.g. `rgb(0, 0, 128)`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Accepts `r,g,b` or `#rrggbb`.
impl FromStr for Rgb {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ShapeError::invalid("color", format!("cannot parse {s:?} as a color"));
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(bad());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
            return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
        }
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>().map_err(|_| bad()))
            .collect::<ShapeResult<Vec<_>>>()?;
        match parts[..] {
            [r, g, b] => Ok(Rgb::new(r, g, b)),
            _ => Err(bad()),
        }
    }
}

/// The sixteen swatches offered to the user: the eight corners of a
/// half-intensity cube, then the same lifted by 127.
pub fn palette() -> Vec<Rgb> {
    let mut colors = Vec::with_capacity(16);
    for intensity in [0u8, 127] {
        for r in [0u8, 128] {
            for g in [0u8, 128] {
                for b in [0u8, 128] {
                    colors.push(Rgb::new(r + intensity, g + intensity, b + intensity));
                }
            }
        }
    }
    colors
}

/// Fixed directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub direction: Normal,
    /// Share of the brightness range swept by the cosine; the rest is a floor.
    pub edge_percent: f32,
}

impl Light {
    pub fn validate(&self) -> ShapeResult<()> {
        for (i, c) in self.direction.iter().enumerate() {
            let name = ["light.direction.x", "light.direction.y", "light.direction.z"][i];
            ensure_finite(name, *c)?;
        }
        ensure_finite("light.edge_percent", self.edge_percent)?;
        if !(0.0..=1.0).contains(&self.edge_percent) {
            return Err(ShapeError::invalid(
                "light.edge_percent",
                format!("{} is outside [0, 1]", self.edge_percent),
            ));
        }
        Ok(())
    }

    /// Color of a face with `normal` painted in `base`.
    pub fn shade(&self, base: Rgb, normal: &Normal) -> Rgb {
        let cos = cosine(normal, &self.direction);
        if cos > 0.0 {
            let factor = (1.0 - cos) * self.edge_percent + (1.0 - self.edge_percent);
            base.map(|c| to_channel(c as f32 * factor))
        } else {
            let factor = (1.0 + cos) * self.edge_percent + (1.0 - self.edge_percent);
            base.map(|c| to_channel(c as f32 * factor + 255.0 * (1.0 - factor)))
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Normal::new(1.0, 1.0, -1.0),
            edge_percent: 0.8,
        }
    }
}

/// Shade with the default light.
pub fn shade(base: Rgb, normal: &Normal) -> Rgb {
    Light::default().shade(base, normal)
}

/// Cosine of the angle between two vectors; 0 when either has no length.
fn cosine(a: &Normal, b: &Normal) -> f32 {
    let lengths = a.norm() * b.norm();
    if !lengths.is_finite() || lengths <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / lengths).clamp(-1.0, 1.0)
}

fn to_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Channels are truncated, so allow one step of float slack.
    fn assert_near(actual: Rgb, expected: Rgb) {
        for (a, e) in actual.channels().into_iter().zip(expected.channels()) {
            assert!(a.abs_diff(e) <= 1, "{actual} != {expected}");
        }
    }

    #[test]
    fn test_facing_light_darkens_fully() {
        // cos = 1: factor bottoms out at 0.2
        let color = shade(Rgb::new(200, 100, 50), &Normal::new(2.0, 2.0, -2.0));
        assert_near(color, Rgb::new(40, 20, 10));
    }

    #[test]
    fn test_opposing_light_whitens_fully() {
        // cos = -1: factor 0.2, so 80% white
        let color = shade(Rgb::new(0, 0, 128), &Normal::new(-1.0, -1.0, 1.0));
        assert_near(color, Rgb::new(204, 204, 229));
    }

    #[test]
    fn test_perpendicular_keeps_base() {
        let color = shade(Rgb::new(10, 130, 250), &Normal::new(1.0, -1.0, 0.0));
        assert_near(color, Rgb::new(10, 130, 250));
    }

    #[test]
    fn test_zero_normal_is_finite() {
        let color = shade(Rgb::new(10, 130, 250), &Normal::zeros());
        assert_near(color, Rgb::new(10, 130, 250));
    }

    #[test]
    fn test_channels_stay_in_range() {
        let normals = [
            Normal::new(1.0, 0.0, 0.0),
            Normal::new(-3.0, 7.0, 0.5),
            Normal::new(0.0, -100.0, 100.0),
            Normal::new(1e-3, 2e-3, -1e-3),
            Normal::new(-1.0, -1.0, 1.0),
        ];
        for base in palette().into_iter().chain([Rgb::WHITE, Rgb::BLACK]) {
            for normal in &normals {
                // u8 cannot leave [0, 255]; check the whitening never undershoots the base
                let shaded = shade(base, normal);
                let cos = cosine(normal, &Light::default().direction);
                if cos <= 0.0 {
                    for (s, b) in shaded.channels().into_iter().zip(base.channels()) {
                        assert!(s >= b.saturating_sub(1));
                    }
                } else {
                    for (s, b) in shaded.channels().into_iter().zip(base.channels()) {
                        assert!(s <= b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_palette() {
        let colors = palette();
        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], Rgb::BLACK);
        assert_eq!(colors[1], Rgb::new(0, 0, 128));
        assert_eq!(colors[8], Rgb::new(127, 127, 127));
        assert_eq!(colors[15], Rgb::WHITE);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!("0, 0, 128".parse::<Rgb>().unwrap(), Rgb::NAVY);
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert!("#ff80".parse::<Rgb>().is_err());
        assert!("#+f+f+f".parse::<Rgb>().is_err());
        assert!("#ff80zz".parse::<Rgb>().is_err());
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("1,2,300".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_as_css() {
        assert_eq!(Rgb::NAVY.to_string(), "rgb(0, 0, 128)");
    }

    #[test]
    fn test_light_validation() {
        assert!(Light::default().validate().is_ok());
        let light = Light {
            edge_percent: 1.5,
            ..Light::default()
        };
        assert!(light.validate().is_err());
    }
}
