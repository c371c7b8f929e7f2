//! Display configuration for rendering solar maps.
//!
//! A [`DisplayConfig`] is an explicit value passed to the renderer. It holds a
//! shared, immutable [`Colormap`] plus the color used for masked ("bad")
//! pixels and the value scaling. Deriving a new configuration never changes
//! the colormap seen by other configurations.

use crate::error::{SolarError, SolarResult};
use crate::meta::ObservationMeta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` or one of a few color names.
    pub fn from_hex(s: &str) -> SolarResult<Self> {
        let named = match s.trim().to_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::rgb(255, 0, 0)),
            "green" => Some(Self::rgb(0, 128, 0)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "yellow" => Some(Self::rgb(255, 255, 0)),
            "transparent" | "none" => Some(Self::transparent()),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| SolarError::InvalidColor(s.to_string()))
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(SolarError::InvalidColor(s.to_string())),
        }
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = SolarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = SolarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A color at a normalized position in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

/// Piecewise-linear colormap over normalized values.
///
/// Always holds at least two ascending stops in [0, 1]; deserialized
/// colormaps go through the same checks as [`Colormap::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColormap")]
pub struct Colormap {
    pub name: String,
    stops: Vec<ColorStop>,
}

#[derive(Deserialize)]
struct RawColormap {
    name: String,
    stops: Vec<ColorStop>,
}

impl TryFrom<RawColormap> for Colormap {
    type Error = SolarError;

    fn try_from(raw: RawColormap) -> SolarResult<Self> {
        Colormap::new(raw.name, raw.stops)
    }
}

/// Channel curves used by the SDO/AIA color tables, `x` in [0, 255].
mod aia_curves {
    pub fn c0(x: f64) -> f64 {
        x
    }

    pub fn c1(x: f64) -> f64 {
        (x * 255.0).sqrt()
    }

    pub fn c2(x: f64) -> f64 {
        x * x / 255.0
    }

    pub fn c3(x: f64) -> f64 {
        (c1(x) + x / 2.0) * 255.0 / (255.0 + 255.0 / 2.0)
    }

    pub fn c4(x: f64) -> f64 {
        x * x * x / (255.0 * 255.0)
    }
}

/// Number of stops sampled from channel curves.
const CURVE_SAMPLES: usize = 33;

impl Colormap {
    /// Create a colormap, validating that stops are sorted and within [0, 1].
    pub fn new(name: impl Into<String>, stops: Vec<ColorStop>) -> SolarResult<Self> {
        let name = name.into();
        let invalid = |message: &str| SolarError::InvalidColormap {
            name: name.clone(),
            message: message.to_string(),
        };

        if stops.len() < 2 {
            return Err(invalid("at least two color stops are required"));
        }
        if stops
            .iter()
            .any(|s| !s.position.is_finite() || !(0.0..=1.0).contains(&s.position))
        {
            return Err(invalid("stop positions must lie in [0, 1]"));
        }
        if stops.windows(2).any(|w| w[1].position < w[0].position) {
            return Err(invalid("stop positions must be ascending"));
        }

        Ok(Self { name, stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Linear black-to-white ramp.
    pub fn gray() -> Self {
        Self {
            name: "gray".to_string(),
            stops: vec![
                ColorStop::new(0.0, Color::BLACK),
                ColorStop::new(1.0, Color::WHITE),
            ],
        }
    }

    fn from_curves(name: &str, r: fn(f64) -> f64, g: fn(f64) -> f64, b: fn(f64) -> f64) -> Self {
        let stops = (0..CURVE_SAMPLES)
            .map(|i| {
                let position = i as f64 / (CURVE_SAMPLES - 1) as f64;
                let x = position * 255.0;
                let channel = |f: fn(f64) -> f64| f(x).round().clamp(0.0, 255.0) as u8;
                ColorStop::new(position, Color::rgb(channel(r), channel(g), channel(b)))
            })
            .collect();
        Self {
            name: name.to_string(),
            stops,
        }
    }

    /// Look up a built-in colormap by name.
    pub fn named(name: &str) -> SolarResult<Self> {
        use aia_curves::*;

        match name.to_lowercase().as_str() {
            "gray" | "grey" | "greys_r" => Ok(Self::gray()),
            "sdoaia94" => Ok(Self::from_curves("sdoaia94", c2, c3, c0)),
            "sdoaia131" => Ok(Self::from_curves("sdoaia131", c1, c0, c3)),
            "sdoaia171" => Ok(Self::from_curves("sdoaia171", c1, c0, c2)),
            "sdoaia193" => Ok(Self::from_curves("sdoaia193", c1, c2, c4)),
            "sdoaia211" => Ok(Self::from_curves("sdoaia211", c1, c0, c3)),
            "sdoaia304" => Ok(Self::from_curves("sdoaia304", c1, c4, c4)),
            "sdoaia335" => Ok(Self::from_curves("sdoaia335", c2, c0, c1)),
            _ => Err(SolarError::UnknownColormap(name.to_string())),
        }
    }

    /// Names accepted by [`Colormap::named`].
    pub fn builtin_names() -> &'static [&'static str] {
        &[
            "gray",
            "sdoaia94",
            "sdoaia131",
            "sdoaia171",
            "sdoaia193",
            "sdoaia211",
            "sdoaia304",
            "sdoaia335",
        ]
    }

    /// Color for a normalized value; `t` is clamped to [0, 1].
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let first = self.stops[0];
        if t <= first.position {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            if t <= high.position {
                let span = high.position - low.position;
                if span <= f64::EPSILON {
                    return high.color;
                }
                return low.color.lerp(high.color, (t - low.position) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

/// Mapping from data values to normalized [0, 1] display values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    Linear,
    Log,
    /// Inverse hyperbolic sine stretch, linear near zero and logarithmic above.
    #[default]
    Asinh,
}

/// Softening parameter of the asinh stretch.
const ASINH_A: f64 = 0.01;

/// Exponent base of the log stretch.
const LOG_A: f64 = 1000.0;

impl Scaling {
    /// Normalize `value` against [`lo`, `hi`] and apply the stretch.
    pub fn normalize(self, value: f64, lo: f64, hi: f64) -> f64 {
        let range = hi - lo;
        let x = if range.abs() < f64::EPSILON {
            0.5
        } else {
            ((value - lo) / range).clamp(0.0, 1.0)
        };
        match self {
            Scaling::Linear => x,
            Scaling::Log => (LOG_A * x + 1.0).log10() / (LOG_A + 1.0).log10(),
            Scaling::Asinh => (x / ASINH_A).asinh() / (1.0 / ASINH_A).asinh(),
        }
    }
}

impl FromStr for Scaling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Scaling::Linear),
            "log" => Ok(Scaling::Log),
            "asinh" => Ok(Scaling::Asinh),
            other => Err(format!("unknown scaling '{}'", other)),
        }
    }
}

/// How a map is drawn: colormap, bad-pixel color, scaling and value limits.
///
/// Cloning is cheap; the colormap is shared until a clone changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    colormap: Arc<Colormap>,
    bad_color: Color,
    scaling: Scaling,
    vmin: Option<f64>,
    vmax: Option<f64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(Arc::new(Colormap::gray()))
    }
}

impl DisplayConfig {
    /// Transparent bad pixels, asinh scaling, limits taken from the data.
    pub fn new(colormap: Arc<Colormap>) -> Self {
        Self {
            colormap,
            bad_color: Color::transparent(),
            scaling: Scaling::default(),
            vmin: None,
            vmax: None,
        }
    }

    /// Default display settings for an observation (instrument colormap).
    pub fn for_observation(meta: &ObservationMeta) -> Self {
        let colormap = match meta.wavelength {
            Some(wavelength) if meta.is_aia() => {
                Colormap::named(&format!("sdoaia{}", wavelength.round() as i64))
                    .unwrap_or_else(|_| Colormap::gray())
            }
            _ => Colormap::gray(),
        };
        Self::new(Arc::new(colormap))
    }

    pub fn colormap(&self) -> &Colormap {
        &self.colormap
    }

    pub fn colormap_handle(&self) -> Arc<Colormap> {
        Arc::clone(&self.colormap)
    }

    pub fn bad_color(&self) -> Color {
        self.bad_color
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    pub fn limits(&self) -> (Option<f64>, Option<f64>) {
        (self.vmin, self.vmax)
    }

    /// Copy of this configuration drawing masked pixels in `color`.
    pub fn with_bad_color(&self, color: Color) -> Self {
        Self {
            bad_color: color,
            ..self.clone()
        }
    }

    pub fn with_colormap(&self, colormap: Arc<Colormap>) -> Self {
        Self {
            colormap,
            ..self.clone()
        }
    }

    pub fn with_scaling(&self, scaling: Scaling) -> Self {
        Self {
            scaling,
            ..self.clone()
        }
    }

    pub fn with_limits(&self, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        Self {
            vmin,
            vmax,
            ..self.clone()
        }
    }

    /// Mutable access to the colormap, copying it first if it is shared.
    pub fn colormap_mut(&mut self) -> &mut Colormap {
        Arc::make_mut(&mut self.colormap)
    }

    /// True if both configurations point at the same colormap allocation.
    pub fn shares_colormap(&self, other: &DisplayConfig) -> bool {
        Arc::ptr_eq(&self.colormap, &other.colormap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hex("00FF00").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hex("#0000FF80").unwrap(), Color::new(0, 0, 255, 128));
        assert_eq!(Color::from_hex("black").unwrap(), Color::BLACK);
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#FFF").is_err());
    }

    #[test]
    fn test_color_display_roundtrip() {
        let color = Color::new(12, 34, 56, 255);
        assert_eq!(color.to_string(), "#0C2238");
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_color_and_scaling_serde() {
        assert_eq!(serde_json::to_string(&Color::rgb(255, 0, 0)).unwrap(), "\"#FF0000\"");
        let color: Color = serde_json::from_str("\"white\"").unwrap();
        assert_eq!(color, Color::WHITE);
        assert!(serde_json::from_str::<Color>("\"#12\"").is_err());

        let scaling: Scaling = serde_json::from_str("\"log\"").unwrap();
        assert_eq!(scaling, Scaling::Log);
    }

    #[test]
    fn test_colormap_sample_endpoints() {
        let gray = Colormap::gray();
        assert_eq!(gray.sample(0.0), Color::BLACK);
        assert_eq!(gray.sample(1.0), Color::WHITE);
        assert_eq!(gray.sample(2.0), Color::WHITE);
        assert_eq!(gray.sample(0.5), Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_colormap_rejects_unsorted_stops() {
        let stops = vec![
            ColorStop::new(0.8, Color::BLACK),
            ColorStop::new(0.2, Color::WHITE),
        ];
        assert!(Colormap::new("bad", stops).is_err());
    }

    #[test]
    fn test_colormap_deserialize_is_validated() {
        let cmap: Colormap = serde_json::from_str(
            r##"{"name": "duo", "stops": [
                {"position": 0.0, "color": "#000000"},
                {"position": 1.0, "color": "#FF0000"}
            ]}"##,
        )
        .unwrap();
        assert_eq!(cmap.stops().len(), 2);
        assert_eq!(cmap.sample(1.0), Color::rgb(255, 0, 0));

        assert!(serde_json::from_str::<Colormap>(r#"{"name": "empty", "stops": []}"#).is_err());
        assert!(serde_json::from_str::<Colormap>(
            r##"{"name": "unsorted", "stops": [
                {"position": 0.9, "color": "#000000"},
                {"position": 0.1, "color": "#FFFFFF"}
            ]}"##
        )
        .is_err());
    }

    #[test]
    fn test_builtin_colormaps_resolve() {
        for name in Colormap::builtin_names() {
            let cmap = Colormap::named(name).unwrap();
            assert_eq!(cmap.sample(0.0), Color::BLACK, "{} should start black", name);
        }
        assert!(Colormap::named("viridis-ish").is_err());
    }

    #[test]
    fn test_scaling_bounds() {
        for scaling in [Scaling::Linear, Scaling::Log, Scaling::Asinh] {
            assert!((scaling.normalize(0.0, 0.0, 100.0)).abs() < 1e-12);
            assert!((scaling.normalize(100.0, 0.0, 100.0) - 1.0).abs() < 1e-12);
            assert!((scaling.normalize(500.0, 0.0, 100.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_log_scaling_ignores_data_units() {
        let expected = (101.0f64).log10() / (1001.0f64).log10();
        for hi in [1e-3, 1.0, 1000.0, 1e6] {
            let v = Scaling::Log.normalize(0.1 * hi, 0.0, hi);
            assert!((v - expected).abs() < 1e-9, "range [0, {}] gave {}", hi, v);
        }
        // Offset ranges behave like ranges starting at zero.
        let shifted = Scaling::Log.normalize(510.0, 500.0, 600.0);
        assert!((shifted - expected).abs() < 1e-9);
        assert!(expected > 0.6);
    }

    #[test]
    fn test_with_bad_color_does_not_touch_original() {
        let base = DisplayConfig::new(Arc::new(Colormap::gray()));
        let derived = base.with_bad_color(Color::BLACK);

        assert_eq!(base.bad_color(), Color::transparent());
        assert_eq!(derived.bad_color(), Color::BLACK);
        assert!(base.shares_colormap(&derived));
    }

    #[test]
    fn test_colormap_mut_copies_shared_colormap() {
        let base = DisplayConfig::new(Arc::new(Colormap::gray()));
        let mut derived = base.clone();
        derived.colormap_mut().name = "edited".to_string();

        assert_eq!(base.colormap().name, "gray");
        assert_eq!(derived.colormap().name, "edited");
        assert!(!base.shares_colormap(&derived));
    }
}
