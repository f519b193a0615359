//! Localization file parsing.
//!
//! Localization files hold one string per line:
//!
//! ```text
//! TITechTemplate.displayName.FusionPower=Fusion Power // optional comment
//! ```
//!
//! The first segment names the template family, the second the text type
//! and the third the template entry it applies to.

/// Template families that ship a localization file.
pub const TRANSLATION_FILES: &[&str] = &[
    "TIBatteryTemplate",
    "TIPlasmaWeaponTemplate",
    "TIDriveTemplate",
    "TIPowerPlantTemplate",
    "TIEffectTemplate",
    "TIProjectTemplate",
    "TIGunTemplate",
    "TIRadiatorTemplate",
    "TIHabModuleTemplate",
    "TIShipArmorTemplate",
    "TIHeatSinkTemplate",
    "TIShipCommandTemplate",
    "TILaserWeaponTemplate",
    "TIShipHullTemplate",
    "TIMagneticGunTemplate",
    "TITechTemplate",
    "TIMissileTemplate",
    "TIUtilityModuleTemplate",
    "TIParticleWeaponTemplate",
    "TIOrgTemplate",
];

/// One localized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Text type, e.g. `displayName` or `description`.
    pub kind: String,
    /// Id of the template entry the text belongs to.
    pub key: String,
    pub value: String,
}

/// Parse every well-formed line of a localization file.
///
/// A line is kept when it has exactly three non-empty dotted segments
/// before the first `=`, a non-empty value without `/`, and (optionally) a
/// non-empty `//` comment after the value. Anything else is skipped.
pub fn parse_localization(text: &str) -> Vec<TranslationEntry> {
    text.split('\n').filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<TranslationEntry> {
    let (path, rest) = line.split_once('=')?;

    let mut segments = path.split('.');
    let (family, kind, key) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() || [family, kind, key].iter().any(|s| s.is_empty()) {
        return None;
    }

    let value = match rest.find("//") {
        Some(start) => {
            if rest.len() == start + 2 {
                return None;
            }
            &rest[..start]
        }
        None => rest,
    };
    if value.is_empty() || value.contains('/') {
        return None;
    }

    Some(TranslationEntry {
        kind: kind.to_string(),
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}
