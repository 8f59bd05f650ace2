use pixop_engine::{
    AdjustLevels, BrightnessContrast, ChannelLevels, ColorBalance, Desaturate, Dither, DitherMode,
    Equalize, GammaCorrection, HistogramChannel, HueRange, HueSaturation, Invert, Levels,
    NormalizeContrast, PixelOp, Posterize, Scale, ScaleMode, StretchContrast, ToneRange,
    AUTO_LEVELS_CLIP,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RecipeError;

/// An ordered list of transform steps, loaded from YAML.
///
/// ```yaml
/// name: poster
/// steps:
///   - op: auto_levels
///   - op: posterize
///     levels: 3
///   - op: dither
///     mode: web_palette
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Recipe {
    /// Name used in logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Steps, applied in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One transform and its parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Desaturate,
    Invert,
    BrightnessContrast {
        /// -1.0..=1.0
        #[serde(default)]
        brightness: f64,
        /// -1.0..=1.0
        #[serde(default)]
        contrast: f64,
    },
    Posterize {
        #[serde(default = "default_posterize_levels")]
        levels: u32,
    },
    Gamma {
        gamma: f64,
    },
    HueSaturation {
        /// Degrees, -180..=180
        #[serde(default)]
        hue: f64,
        /// Percent, -100..=100
        #[serde(default)]
        lightness: f64,
        /// Percent, -100..=100
        #[serde(default)]
        saturation: f64,
        /// Extra adjustments for single hue sextants
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ranges: Vec<HueRangeAdjust>,
    },
    ColorBalance {
        #[serde(default)]
        shadows: ToneShift,
        #[serde(default)]
        midtones: ToneShift,
        #[serde(default)]
        highlights: ToneShift,
        #[serde(default)]
        preserve_luminosity: bool,
    },
    Equalize,
    AutoLevels {
        #[serde(default = "default_clip")]
        clip: f64,
    },
    Levels {
        #[serde(default)]
        value: ChannelLevelsConfig,
        #[serde(default)]
        red: ChannelLevelsConfig,
        #[serde(default)]
        green: ChannelLevelsConfig,
        #[serde(default)]
        blue: ChannelLevelsConfig,
    },
    StretchContrast,
    NormalizeContrast,
    Dither {
        #[serde(default)]
        mode: DitherModeConfig,
        #[serde(default = "default_serpentine")]
        serpentine: bool,
    },
    Scale {
        #[serde(default)]
        mode: ScaleModeConfig,
        width: f64,
        height: f64,
        #[serde(default)]
        allow_upscaling: bool,
    },
}

fn default_posterize_levels() -> u32 {
    4
}

fn default_clip() -> f64 {
    AUTO_LEVELS_CLIP
}

fn default_serpentine() -> bool {
    true
}

fn default_gamma() -> f64 {
    1.0
}

fn default_high() -> f64 {
    255.0
}

/// Hue sextant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HueRangeName {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
}

impl From<HueRangeName> for HueRange {
    fn from(name: HueRangeName) -> Self {
        match name {
            HueRangeName::Red => HueRange::Red,
            HueRangeName::Yellow => HueRange::Yellow,
            HueRangeName::Green => HueRange::Green,
            HueRangeName::Cyan => HueRange::Cyan,
            HueRangeName::Blue => HueRange::Blue,
            HueRangeName::Magenta => HueRange::Magenta,
        }
    }
}

/// Hue/lightness/saturation shift for one sextant.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HueRangeAdjust {
    pub range: HueRangeName,
    #[serde(default)]
    pub hue: f64,
    #[serde(default)]
    pub lightness: f64,
    #[serde(default)]
    pub saturation: f64,
}

/// Color balance shifts of one tonal range, each -100..=100.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ToneShift {
    #[serde(default)]
    pub cyan_red: f64,
    #[serde(default)]
    pub magenta_green: f64,
    #[serde(default)]
    pub yellow_blue: f64,
}

/// Levels of one channel; omitted fields keep the identity mapping.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChannelLevelsConfig {
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default)]
    pub low_input: f64,
    #[serde(default = "default_high")]
    pub high_input: f64,
    #[serde(default)]
    pub low_output: f64,
    #[serde(default = "default_high")]
    pub high_output: f64,
}

impl Default for ChannelLevelsConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            low_input: 0.0,
            high_input: default_high(),
            low_output: 0.0,
            high_output: default_high(),
        }
    }
}

impl From<&ChannelLevelsConfig> for ChannelLevels {
    fn from(c: &ChannelLevelsConfig) -> Self {
        ChannelLevels {
            gamma: c.gamma,
            low_input: c.low_input,
            high_input: c.high_input,
            low_output: c.low_output,
            high_output: c.high_output,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DitherModeConfig {
    #[default]
    BlackWhite,
    WebPalette,
}

impl From<DitherModeConfig> for DitherMode {
    fn from(mode: DitherModeConfig) -> Self {
        match mode {
            DitherModeConfig::BlackWhite => DitherMode::BlackWhite,
            DitherModeConfig::WebPalette => DitherMode::WebPalette,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleModeConfig {
    /// `width`/`height` are percentages
    Percentage,
    /// `width`/`height` bound the result, aspect ratio kept
    #[default]
    KeepRatio,
    /// `width`/`height` are the exact result size
    Exact,
}

impl Step {
    /// The `op` tag of this step.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Desaturate => "desaturate",
            Step::Invert => "invert",
            Step::BrightnessContrast { .. } => "brightness_contrast",
            Step::Posterize { .. } => "posterize",
            Step::Gamma { .. } => "gamma",
            Step::HueSaturation { .. } => "hue_saturation",
            Step::ColorBalance { .. } => "color_balance",
            Step::Equalize => "equalize",
            Step::AutoLevels { .. } => "auto_levels",
            Step::Levels { .. } => "levels",
            Step::StretchContrast => "stretch_contrast",
            Step::NormalizeContrast => "normalize_contrast",
            Step::Dither { .. } => "dither",
            Step::Scale { .. } => "scale",
        }
    }

    /// Every numeric parameter with its name.
    fn numbers(&self) -> Vec<(String, f64)> {
        fn tone(prefix: &str, t: &ToneShift) -> [(String, f64); 3] {
            [
                (format!("{prefix}.cyan_red"), t.cyan_red),
                (format!("{prefix}.magenta_green"), t.magenta_green),
                (format!("{prefix}.yellow_blue"), t.yellow_blue),
            ]
        }

        fn levels(prefix: &str, c: &ChannelLevelsConfig) -> [(String, f64); 5] {
            [
                (format!("{prefix}.gamma"), c.gamma),
                (format!("{prefix}.low_input"), c.low_input),
                (format!("{prefix}.high_input"), c.high_input),
                (format!("{prefix}.low_output"), c.low_output),
                (format!("{prefix}.high_output"), c.high_output),
            ]
        }

        match self {
            Step::BrightnessContrast {
                brightness,
                contrast,
            } => vec![
                ("brightness".into(), *brightness),
                ("contrast".into(), *contrast),
            ],
            Step::Gamma { gamma } => vec![("gamma".into(), *gamma)],
            Step::HueSaturation {
                hue,
                lightness,
                saturation,
                ranges,
            } => {
                let mut numbers = vec![
                    ("hue".into(), *hue),
                    ("lightness".into(), *lightness),
                    ("saturation".into(), *saturation),
                ];
                for (i, r) in ranges.iter().enumerate() {
                    numbers.push((format!("ranges[{i}].hue"), r.hue));
                    numbers.push((format!("ranges[{i}].lightness"), r.lightness));
                    numbers.push((format!("ranges[{i}].saturation"), r.saturation));
                }
                numbers
            }
            Step::ColorBalance {
                shadows,
                midtones,
                highlights,
                ..
            } => tone("shadows", shadows)
                .into_iter()
                .chain(tone("midtones", midtones))
                .chain(tone("highlights", highlights))
                .collect(),
            Step::AutoLevels { clip } => vec![("clip".into(), *clip)],
            Step::Levels {
                value,
                red,
                green,
                blue,
            } => levels("value", value)
                .into_iter()
                .chain(levels("red", red))
                .chain(levels("green", green))
                .chain(levels("blue", blue))
                .collect(),
            Step::Scale { width, height, .. } => {
                vec![("width".into(), *width), ("height".into(), *height)]
            }
            _ => Vec::new(),
        }
    }

    /// Check parameters that the engine cannot clamp into a sane domain.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in self.numbers() {
            if !value.is_finite() {
                return Err(format!("{name} must be a finite number, got {value}"));
            }
        }

        match self {
            Step::AutoLevels { clip } if !(0.0..=1.0).contains(clip) => {
                Err(format!("clip must be between 0 and 1, got {clip}"))
            }
            Step::Scale { width, height, .. } if *width < 0.0 || *height < 0.0 => {
                Err(format!("scale size must not be negative, got {width}x{height}"))
            }
            _ => Ok(()),
        }
    }

    /// Build the engine operation for this step.
    pub fn build(&self) -> Box<dyn PixelOp + Send> {
        match self {
            Step::Desaturate => Box::new(Desaturate),
            Step::Invert => Box::new(Invert),
            Step::BrightnessContrast {
                brightness,
                contrast,
            } => Box::new(BrightnessContrast::new(*brightness, *contrast)),
            Step::Posterize { levels } => Box::new(Posterize::new(*levels)),
            Step::Gamma { gamma } => Box::new(GammaCorrection::new(*gamma)),
            Step::HueSaturation {
                hue,
                lightness,
                saturation,
                ranges,
            } => {
                let op = ranges.iter().fold(
                    HueSaturation::new(*hue, *lightness, *saturation),
                    |op, r| op.range(r.range.into(), r.hue, r.lightness, r.saturation),
                );
                Box::new(op)
            }
            Step::ColorBalance {
                shadows,
                midtones,
                highlights,
                preserve_luminosity,
            } => Box::new(
                ColorBalance::new(*preserve_luminosity)
                    .shadows(shadows.cyan_red, shadows.magenta_green, shadows.yellow_blue)
                    .range(
                        ToneRange::Midtones,
                        midtones.cyan_red,
                        midtones.magenta_green,
                        midtones.yellow_blue,
                    )
                    .highlights(
                        highlights.cyan_red,
                        highlights.magenta_green,
                        highlights.yellow_blue,
                    ),
            ),
            Step::Equalize => Box::new(Equalize::new()),
            Step::AutoLevels { clip } => Box::new(AdjustLevels::with_clip(*clip)),
            Step::Levels {
                value,
                red,
                green,
                blue,
            } => {
                let levels = Levels::identity()
                    .with_channel(HistogramChannel::Value, value.into())
                    .with_channel(HistogramChannel::Red, red.into())
                    .with_channel(HistogramChannel::Green, green.into())
                    .with_channel(HistogramChannel::Blue, blue.into());
                Box::new(AdjustLevels::with_levels(levels))
            }
            Step::StretchContrast => Box::new(StretchContrast::new()),
            Step::NormalizeContrast => Box::new(NormalizeContrast::new()),
            Step::Dither { mode, serpentine } => {
                Box::new(Dither::new((*mode).into()).serpentine(*serpentine))
            }
            Step::Scale {
                mode,
                width,
                height,
                allow_upscaling,
            } => {
                let mode = match mode {
                    ScaleModeConfig::Percentage => ScaleMode::Percentage {
                        width: *width,
                        height: *height,
                    },
                    ScaleModeConfig::KeepRatio => ScaleMode::KeepRatio {
                        max_width: *width as usize,
                        max_height: *height as usize,
                        allow_upscaling: *allow_upscaling,
                    },
                    ScaleModeConfig::Exact => ScaleMode::Exact {
                        width: *width as usize,
                        height: *height as usize,
                    },
                };
                Box::new(Scale::new(mode))
            }
        }
    }
}

impl Recipe {
    /// Parse and validate a recipe.
    pub fn from_yaml_str(content: &str) -> Result<Self, RecipeError> {
        let recipe: Self = serde_yaml::from_str(content)?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Read, parse and validate a recipe file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let recipe = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            name = recipe.display_name(),
            steps = recipe.steps.len(),
            "Loaded recipe"
        );
        Ok(recipe)
    }

    /// Validate every step, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), RecipeError> {
        for (index, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|reason| RecipeError::InvalidStep { index, reason })?;
        }
        Ok(())
    }

    /// Name for logs; `unnamed` when the recipe has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let recipe = Recipe::from_yaml_str(
            r#"
steps:
  - op: posterize
  - op: dither
  - op: auto_levels
  - op: brightness_contrast
"#,
        )
        .unwrap();

        assert_eq!(recipe.name, None);
        assert_eq!(recipe.display_name(), "unnamed");
        assert_eq!(recipe.steps[0], Step::Posterize { levels: 4 });
        assert_eq!(
            recipe.steps[1],
            Step::Dither {
                mode: DitherModeConfig::BlackWhite,
                serpentine: true
            }
        );
        assert_eq!(recipe.steps[2], Step::AutoLevels { clip: 0.006 });
        assert_eq!(
            recipe.steps[3],
            Step::BrightnessContrast {
                brightness: 0.0,
                contrast: 0.0
            }
        );
    }

    #[test]
    fn test_every_op_parses_and_builds() {
        let recipe = Recipe::from_yaml_str(
            r#"
name: everything
steps:
  - op: desaturate
  - op: invert
  - op: brightness_contrast
    brightness: 0.2
    contrast: -0.1
  - op: posterize
    levels: 3
  - op: gamma
    gamma: 2.2
  - op: hue_saturation
    hue: 30
    ranges:
      - range: blue
        saturation: -50
  - op: color_balance
    midtones:
      cyan_red: 20
    preserve_luminosity: true
  - op: equalize
  - op: auto_levels
    clip: 0.01
  - op: levels
    red:
      low_input: 10
      high_input: 240
  - op: stretch_contrast
  - op: normalize_contrast
  - op: dither
    mode: web_palette
    serpentine: false
  - op: scale
    mode: exact
    width: 32
    height: 16
"#,
        )
        .unwrap();

        let names: Vec<&str> = recipe.steps.iter().map(Step::name).collect();
        assert_eq!(
            names,
            vec![
                "desaturate",
                "invert",
                "brightness_contrast",
                "posterize",
                "gamma",
                "hue_saturation",
                "color_balance",
                "equalize",
                "auto_levels",
                "levels",
                "stretch_contrast",
                "normalize_contrast",
                "dither",
                "scale",
            ]
        );
        for step in &recipe.steps {
            let op = step.build();
            assert_eq!(op.single_step(), matches!(step, Step::Scale { .. }));
        }
    }

    #[test]
    fn test_levels_defaults_are_identity() {
        let recipe =
            Recipe::from_yaml_str("steps:\n  - op: levels\n    blue:\n      gamma: 1.5\n").unwrap();
        match &recipe.steps[0] {
            Step::Levels { value, blue, .. } => {
                assert_eq!(value, &ChannelLevelsConfig::default());
                assert_eq!(blue.gamma, 1.5);
                assert_eq!(blue.high_input, 255.0);
            }
            other => panic!("Expected levels step, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let yaml = "steps:\n  - op: invert\n  - op: gamma\n    gamma: .nan\n";
        let err = Recipe::from_yaml_str(yaml).unwrap_err();
        match err {
            RecipeError::InvalidStep { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("gamma"), "{reason}");
            }
            other => panic!("Expected InvalidStep, got {other:?}"),
        }
    }

    #[test]
    fn test_clip_and_scale_domain_rejected() {
        assert!(matches!(
            Recipe::from_yaml_str("steps:\n  - op: auto_levels\n    clip: 1.5\n"),
            Err(RecipeError::InvalidStep { index: 0, .. })
        ));
        assert!(matches!(
            Recipe::from_yaml_str("steps:\n  - op: scale\n    width: -3\n    height: 10\n"),
            Err(RecipeError::InvalidStep { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_op_is_yaml_error() {
        let err = Recipe::from_yaml_str("steps:\n  - op: sharpen\n").unwrap_err();
        assert!(matches!(err, RecipeError::Yaml(_)));
    }

    #[test]
    fn test_posterize_levels_not_clamped_in_config() {
        // Clamping to 2 levels is the engine's job
        let recipe = Recipe::from_yaml_str("steps:\n  - op: posterize\n    levels: 0\n").unwrap();
        assert_eq!(recipe.steps[0], Step::Posterize { levels: 0 });
    }

    #[test]
    fn test_serializes_back_to_tagged_yaml() {
        let recipe = Recipe {
            name: Some("x".to_string()),
            steps: vec![Step::Equalize, Step::Posterize { levels: 5 }],
        };
        let yaml = serde_yaml::to_string(&recipe).unwrap();
        assert!(yaml.contains("op: equalize"));
        assert_eq!(Recipe::from_yaml_str(&yaml).unwrap(), recipe);
    }
}
