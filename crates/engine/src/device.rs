//! Static description of the attached wheel.

use openracing_ffb::{EffectClassSet, EffectKind, GAIN_MAX, LEVEL_MAX};
use racing_wheel_hid_logitech_protocol::{AutocenterStyle, LogitechModel, RangeStyle};

/// What the engine needs to know about the wheel it drives.
///
/// # Examples
///
/// ```
/// use openracing_ffb::EffectKind;
/// use racing_wheel_ffb_engine::DeviceDescriptor;
/// use racing_wheel_hid_logitech_protocol::{LogitechModel, RangeStyle};
///
/// let g27 = DeviceDescriptor::from_model(LogitechModel::G27);
/// assert!(g27.supports(EffectKind::Spring));
/// assert_eq!(g27.range_style(), RangeStyle::G25);
/// assert!(g27.has_leds());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    model: LogitechModel,
    effects: EffectClassSet,
    level_max: i32,
    gain_max: u32,
}

impl DeviceDescriptor {
    /// Descriptor for a known model. Wheels without force feedback accept no
    /// effects at all.
    pub fn from_model(model: LogitechModel) -> Self {
        let effects = if model.has_force_feedback() {
            EffectClassSet::all()
        } else {
            EffectClassSet::empty()
        };
        Self {
            model,
            effects,
            level_max: LEVEL_MAX,
            gain_max: GAIN_MAX,
        }
    }

    /// Descriptor from USB identification (product ID and `bcdDevice`).
    pub fn from_usb(product_id: u16, revision: u16) -> Self {
        Self::from_model(LogitechModel::from_device(product_id, revision))
    }

    /// Restrict the accepted effect classes.
    pub fn with_effects(mut self, effects: EffectClassSet) -> Self {
        self.effects = effects;
        self
    }

    pub fn model(&self) -> LogitechModel {
        self.model
    }

    pub fn effects(&self) -> EffectClassSet {
        self.effects
    }

    pub fn supports(&self, kind: EffectKind) -> bool {
        self.effects.contains(kind)
    }

    /// Largest force level an effect may request.
    pub fn level_max(&self) -> i32 {
        self.level_max
    }

    /// Largest gain value.
    pub fn gain_max(&self) -> u32 {
        self.gain_max
    }

    pub fn autocenter_style(&self) -> AutocenterStyle {
        self.model.autocenter_style()
    }

    pub fn range_style(&self) -> RangeStyle {
        self.model.range_style()
    }

    /// Accepted rotation range in degrees, `(min, max)`.
    pub fn range_limits(&self) -> (u16, u16) {
        self.model.range_limits()
    }

    pub fn has_leds(&self) -> bool {
        self.model.has_leds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racing_wheel_hid_logitech_protocol::product_ids;

    #[test]
    fn test_force_feedback_wheel_supports_all_classes() {
        let dfp = DeviceDescriptor::from_usb(product_ids::DFP_WHEEL, 0x1300);
        for kind in EffectKind::ALL {
            assert!(dfp.supports(kind), "{kind:?}");
        }
        assert_eq!(dfp.level_max(), 0x7fff);
        assert_eq!(dfp.gain_max(), 0xffff);
    }

    #[test]
    fn test_wingman_formula_supports_nothing() {
        let wheel = DeviceDescriptor::from_usb(product_ids::WINGMAN_FG, 0);
        assert!(wheel.effects().is_empty());
        assert_eq!(wheel.autocenter_style(), AutocenterStyle::None);
    }

    #[test]
    fn test_formula_force_ex_from_revision() {
        let wheel = DeviceDescriptor::from_usb(product_ids::WHEEL, 0x2100);
        assert_eq!(wheel.model(), LogitechModel::FormulaForceEx);
        assert_eq!(wheel.autocenter_style(), AutocenterStyle::FormulaForceEx);
        assert_eq!(wheel.range_limits(), (40, 270));
    }

    #[test]
    fn test_restricted_effects() {
        let wheel = DeviceDescriptor::from_model(LogitechModel::G29)
            .with_effects(EffectClassSet::empty().with(EffectKind::Constant));
        assert!(wheel.supports(EffectKind::Constant));
        assert!(!wheel.supports(EffectKind::Friction));
    }
}
