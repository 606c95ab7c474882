use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const BRIGHTNESS_RANGE: (i32, i32) = (0, 200);
pub const CONTRAST_RANGE: (i32, i32) = (0, 200);
pub const SATURATION_RANGE: (i32, i32) = (0, 200);
pub const BLUR_RANGE: (f32, f32) = (0.0, 20.0);
pub const SHARPEN_RANGE: (f32, f32) = (0.0, 10.0);
pub const HUE_RANGE: (i32, i32) = (0, 360);

/// Named color filter applied as the last color stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFilter {
    #[default]
    Normal,
    Grayscale,
    Sepia,
    Invert,
    Cool,
    Warm,
}

impl ColorFilter {
    /// Gallery order.
    pub const ALL: [ColorFilter; 6] = [
        Self::Normal,
        Self::Grayscale,
        Self::Sepia,
        Self::Invert,
        Self::Cool,
        Self::Warm,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Invert => "invert",
            Self::Cool => "cool",
            Self::Warm => "warm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
            Self::Invert => "Invert",
            Self::Cool => "Cool",
            Self::Warm => "Warm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "No filter applied",
            Self::Grayscale => "Convert image to black and white",
            Self::Sepia => "Warm brownish tone",
            Self::Invert => "Invert all colors",
            Self::Cool => "Cool blue tone",
            Self::Warm => "Warm orange tone",
        }
    }
}

impl Display for ColorFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ColorFilter {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.id() == value)
            .ok_or_else(|| DomainError::UnknownFilter(value.to_string()))
    }
}

/// One complete set of slider, switch and filter values.
///
/// The record is always fully populated; the `with_*` methods return a copy with a
/// single field changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentParameters {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub blur: f32,
    pub sharpen: f32,
    pub hue: i32,
    pub selected_filter: ColorFilter,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self {
            brightness: 100,
            contrast: 100,
            saturation: 100,
            blur: 0.0,
            sharpen: 0.0,
            hue: 0,
            selected_filter: ColorFilter::Normal,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

impl AdjustmentParameters {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_int("brightness", self.brightness, BRIGHTNESS_RANGE)?;
        check_int("contrast", self.contrast, CONTRAST_RANGE)?;
        check_int("saturation", self.saturation, SATURATION_RANGE)?;
        check_real("blur", self.blur, BLUR_RANGE)?;
        check_real("sharpen", self.sharpen, SHARPEN_RANGE)?;
        check_int("hue", self.hue, HUE_RANGE)?;
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|error| DomainError::MalformedParameters(error.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> String {
        // Every field is a plain number, bool or unit enum, so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn with_brightness(self, brightness: i32) -> Self {
        Self { brightness, ..self }
    }

    pub fn with_contrast(self, contrast: i32) -> Self {
        Self { contrast, ..self }
    }

    pub fn with_saturation(self, saturation: i32) -> Self {
        Self { saturation, ..self }
    }

    pub fn with_blur(self, blur: f32) -> Self {
        Self { blur, ..self }
    }

    pub fn with_sharpen(self, sharpen: f32) -> Self {
        Self { sharpen, ..self }
    }

    pub fn with_hue(self, hue: i32) -> Self {
        Self { hue, ..self }
    }

    pub fn with_filter(self, selected_filter: ColorFilter) -> Self {
        Self {
            selected_filter,
            ..self
        }
    }

    pub fn with_flip_horizontal(self, flip_horizontal: bool) -> Self {
        Self {
            flip_horizontal,
            ..self
        }
    }

    pub fn with_flip_vertical(self, flip_vertical: bool) -> Self {
        Self {
            flip_vertical,
            ..self
        }
    }
}

fn check_int(name: &'static str, value: i32, (min, max): (i32, i32)) -> Result<(), DomainError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(DomainError::ParameterOutOfRange {
        name,
        value: f64::from(value),
        min: f64::from(min),
        max: f64::from(max),
    })
}

fn check_real(name: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), DomainError> {
    if value.is_finite() && (min..=max).contains(&value) {
        return Ok(());
    }
    Err(DomainError::ParameterOutOfRange {
        name,
        value: f64::from(value),
        min: f64::from(min),
        max: f64::from(max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_identity() {
        let params = AdjustmentParameters::default();
        assert_eq!(params.brightness, 100);
        assert_eq!(params.contrast, 100);
        assert_eq!(params.saturation, 100);
        assert_eq!(params.blur, 0.0);
        assert_eq!(params.sharpen, 0.0);
        assert_eq!(params.hue, 0);
        assert_eq!(params.selected_filter, ColorFilter::Normal);
        assert!(!params.flip_horizontal);
        assert!(!params.flip_vertical);
        assert!(params.is_identity());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn with_methods_change_exactly_one_field() {
        let base = AdjustmentParameters::default();
        let changed = base.with_hue(90);
        assert_eq!(changed.hue, 90);
        assert_eq!(changed.with_hue(0), base);
        assert_eq!(
            base.with_filter(ColorFilter::Sepia).selected_filter,
            ColorFilter::Sepia
        );
        assert!(base.with_flip_vertical(true).flip_vertical);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let params = AdjustmentParameters::default().with_brightness(201);
        assert!(matches!(
            params.validate(),
            Err(DomainError::ParameterOutOfRange {
                name: "brightness",
                ..
            })
        ));

        let params = AdjustmentParameters::default().with_blur(f32::NAN);
        assert!(matches!(
            params.validate(),
            Err(DomainError::ParameterOutOfRange { name: "blur", .. })
        ));

        let params = AdjustmentParameters::default().with_hue(-1);
        assert!(params.validate().is_err());
        assert!(AdjustmentParameters::default()
            .with_hue(360)
            .with_sharpen(10.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn filters_parse_from_their_ids() {
        for filter in ColorFilter::ALL {
            assert_eq!(filter.id().parse::<ColorFilter>(), Ok(filter));
        }
        assert!(matches!(
            "vintage".parse::<ColorFilter>(),
            Err(DomainError::UnknownFilter(_))
        ));
        assert_eq!(ColorFilter::Cool.description(), "Cool blue tone");
    }

    #[test]
    fn json_uses_front_end_field_names() {
        let params = AdjustmentParameters::default()
            .with_filter(ColorFilter::Warm)
            .with_flip_horizontal(true);
        let json = params.to_json();
        assert!(json.contains("\"selectedFilter\":\"warm\""));
        assert!(json.contains("\"flipHorizontal\":true"));
        assert_eq!(AdjustmentParameters::from_json(&json), Ok(params));
    }

    #[test]
    fn json_rejects_partial_records() {
        let result = AdjustmentParameters::from_json(r#"{"brightness":120}"#);
        assert!(matches!(result, Err(DomainError::MalformedParameters(_))));
    }
}
