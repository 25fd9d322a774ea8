//! Logitech device model classification.

use crate::ids::{FORMULA_FORCE_EX_REVISION, product_ids};
use crate::output::{MAX_RANGE_DEG, MIN_RANGE_DEG};

/// Logitech wheel model classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogitechModel {
    /// WingMan Formula, wheel without force feedback.
    WingManFormula,
    /// WingMan Formula Force GP.
    WingManFormulaForce,
    /// Driving Force / Formula Force EX.
    DrivingForce,
    /// Formula Force EX firmware behind the Driving Force product ID.
    FormulaForceEx,
    /// MOMO Force and MOMO Racing.
    Momo,
    /// Driving Force Pro.
    DrivingForcePro,
    /// G25 racing wheel.
    G25,
    /// Driving Force GT.
    DrivingForceGt,
    /// G27 racing wheel.
    G27,
    /// G29 racing wheel.
    G29,
    /// Wii speed force wheel.
    WiiWheel,
    /// Unknown or future Logitech wheel.
    Unknown,
}

/// Which centering spring command the wheel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutocenterStyle {
    /// `0xFE 0x0D` spring plus activate, full stiffness (MOMO wheels)
    Momo,
    /// `0xFE 0x0D` spring plus activate, half stiffness
    Default,
    /// Single `0xFE 0x03` command
    FormulaForceEx,
    /// No centering spring
    None,
}

/// Which range command the wheel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeStyle {
    /// Range in degrees (`0xF8 0x81`)
    G25,
    /// Coarse plus fine limit
    DrivingForcePro,
    /// Fixed range
    None,
}

impl LogitechModel {
    /// Classify a device by its product ID.
    pub fn from_product_id(product_id: u16) -> Self {
        match product_id {
            product_ids::WINGMAN_FG => Self::WingManFormula,
            product_ids::WINGMAN_FFG => Self::WingManFormulaForce,
            product_ids::WHEEL => Self::DrivingForce,
            product_ids::MOMO_WHEEL | product_ids::MOMO_WHEEL2 => Self::Momo,
            product_ids::DFP_WHEEL => Self::DrivingForcePro,
            product_ids::G25_WHEEL => Self::G25,
            product_ids::DFGT_WHEEL => Self::DrivingForceGt,
            product_ids::G27_WHEEL => Self::G27,
            product_ids::G29_WHEEL => Self::G29,
            product_ids::WII_WHEEL => Self::WiiWheel,
            _ => Self::Unknown,
        }
    }

    /// Classify a device by product ID and firmware revision (`bcdDevice`).
    ///
    /// The Formula Force EX shares the Driving Force product ID and is only
    /// told apart by its revision.
    pub fn from_device(product_id: u16, revision: u16) -> Self {
        match Self::from_product_id(product_id) {
            Self::DrivingForce if revision == FORMULA_FORCE_EX_REVISION => Self::FormulaForceEx,
            model => model,
        }
    }

    /// Whether the wheel has force feedback at all.
    pub fn has_force_feedback(self) -> bool {
        !matches!(self, Self::WingManFormula | Self::Unknown)
    }

    pub fn autocenter_style(self) -> AutocenterStyle {
        match self {
            Self::WingManFormula | Self::Unknown => AutocenterStyle::None,
            Self::Momo => AutocenterStyle::Momo,
            Self::FormulaForceEx => AutocenterStyle::FormulaForceEx,
            _ => AutocenterStyle::Default,
        }
    }

    pub fn range_style(self) -> RangeStyle {
        match self {
            Self::DrivingForcePro => RangeStyle::DrivingForcePro,
            Self::G25 | Self::DrivingForceGt | Self::G27 | Self::G29 => RangeStyle::G25,
            _ => RangeStyle::None,
        }
    }

    /// Accepted rotation range in degrees, `(min, max)`.
    pub fn range_limits(self) -> (u16, u16) {
        match self {
            Self::WingManFormula | Self::WingManFormulaForce => (MIN_RANGE_DEG, 180),
            Self::DrivingForcePro
            | Self::G25
            | Self::DrivingForceGt
            | Self::G27
            | Self::G29 => (MIN_RANGE_DEG, MAX_RANGE_DEG),
            _ => (MIN_RANGE_DEG, 270),
        }
    }

    /// Whether the wheel has rev-light LEDs.
    pub fn has_leds(self) -> bool {
        matches!(self, Self::G27 | Self::G29)
    }
}

/// Return `true` if the product ID corresponds to a known Logitech wheel.
pub fn is_wheel_product(product_id: u16) -> bool {
    LogitechModel::from_product_id(product_id) != LogitechModel::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_g27() -> Result<(), Box<dyn std::error::Error>> {
        let model = LogitechModel::from_product_id(product_ids::G27_WHEEL);
        assert_eq!(model, LogitechModel::G27);
        assert_eq!(model.range_style(), RangeStyle::G25);
        assert_eq!(model.range_limits(), (40, 900));
        assert!(model.has_leds());
        Ok(())
    }

    #[test]
    fn test_model_dfp() -> Result<(), Box<dyn std::error::Error>> {
        let model = LogitechModel::from_product_id(product_ids::DFP_WHEEL);
        assert_eq!(model.range_style(), RangeStyle::DrivingForcePro);
        assert_eq!(model.autocenter_style(), AutocenterStyle::Default);
        assert!(!model.has_leds());
        Ok(())
    }

    #[test]
    fn test_model_momo_variants() -> Result<(), Box<dyn std::error::Error>> {
        for pid in [product_ids::MOMO_WHEEL, product_ids::MOMO_WHEEL2] {
            let model = LogitechModel::from_product_id(pid);
            assert_eq!(model.autocenter_style(), AutocenterStyle::Momo);
            assert_eq!(model.range_style(), RangeStyle::None);
            assert_eq!(model.range_limits(), (40, 270));
        }
        Ok(())
    }

    #[test]
    fn test_formula_force_ex_needs_revision() -> Result<(), Box<dyn std::error::Error>> {
        let ffex = LogitechModel::from_device(product_ids::WHEEL, 0x2100);
        assert_eq!(ffex, LogitechModel::FormulaForceEx);
        assert_eq!(ffex.autocenter_style(), AutocenterStyle::FormulaForceEx);

        let dfex = LogitechModel::from_device(product_ids::WHEEL, 0x1350);
        assert_eq!(dfex, LogitechModel::DrivingForce);
        assert_eq!(dfex.autocenter_style(), AutocenterStyle::Default);

        let g25 = LogitechModel::from_device(product_ids::G25_WHEEL, 0x2100);
        assert_eq!(g25, LogitechModel::G25);
        Ok(())
    }

    #[test]
    fn test_wingman_formula_has_no_effects() -> Result<(), Box<dyn std::error::Error>> {
        let model = LogitechModel::from_product_id(product_ids::WINGMAN_FG);
        assert!(!model.has_force_feedback());
        assert_eq!(model.range_limits(), (40, 180));
        Ok(())
    }

    #[test]
    fn test_is_wheel_product() -> Result<(), Box<dyn std::error::Error>> {
        assert!(is_wheel_product(product_ids::G29_WHEEL));
        assert!(is_wheel_product(product_ids::WII_WHEEL));
        assert!(!is_wheel_product(0xFFFF));
        assert!(!is_wheel_product(0x0000));
        Ok(())
    }
}
