// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node types and the animatable property identifier space.

use crate::math::Vec4;

/// The kind of a node.
///
/// Types differ only in which properties apply to them (see
/// [`supports`](Self::supports)) and in a few lifecycle rules for bones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A (possibly nine-sliced) rectangle.
    #[default]
    Box,
    /// A run of text laid out with a font.
    Text,
    /// A circular or annular sector.
    Pie,
    /// A node driven by a skeleton. Bones cannot be deleted or reparented and
    /// ignore direct property writes.
    Bone,
}

impl NodeType {
    /// Returns whether `property` applies to nodes of this type.
    #[must_use]
    pub const fn supports(self, property: Property) -> bool {
        match property {
            Property::Slice9 => matches!(self, Self::Box),
            Property::FillAngle | Property::InnerRadius => matches!(self, Self::Pie),
            _ => true,
        }
    }

    /// Returns whether this is [`NodeType::Bone`].
    #[inline]
    #[must_use]
    pub const fn is_bone(self) -> bool {
        matches!(self, Self::Bone)
    }
}

/// An animatable node property.
///
/// Every property is stored as a [`Vec4`]. The discriminants are the stable
/// numeric ids exposed to embedders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Property {
    /// Local translation.
    Position = 0,
    /// Euler rotation in degrees; `z` rotates in the screen plane.
    Rotation = 1,
    /// Local scale.
    Scale = 2,
    /// Fill color (RGBA).
    Color = 3,
    /// Node extent.
    Size = 4,
    /// Text outline color.
    Outline = 5,
    /// Text shadow color.
    Shadow = 6,
    /// Nine-slice border insets (left, top, right, bottom). Box nodes only.
    Slice9 = 7,
    /// Sector angle in degrees, in `x`. Pie nodes only.
    FillAngle = 8,
    /// Inner radius of the sector, in `x`. Pie nodes only.
    InnerRadius = 9,
}

impl Property {
    /// Number of properties.
    pub const COUNT: usize = 10;

    /// Every property in id order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Position,
        Self::Rotation,
        Self::Scale,
        Self::Color,
        Self::Size,
        Self::Outline,
        Self::Shadow,
        Self::Slice9,
        Self::FillAngle,
        Self::InnerRadius,
    ];

    /// Returns the stable numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a property by numeric id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < Self::COUNT {
            Some(Self::ALL[id as usize])
        } else {
            None
        }
    }

    /// Returns the property name used by scripts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Color => "color",
            Self::Size => "size",
            Self::Outline => "outline",
            Self::Shadow => "shadow",
            Self::Slice9 => "slice9",
            Self::FillAngle => "fill_angle",
            Self::InnerRadius => "inner_radius",
        }
    }

    /// Looks up a property by script name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns whether writes to this property move the node (and therefore
    /// its descendants).
    #[inline]
    #[must_use]
    pub const fn affects_transform(self) -> bool {
        matches!(self, Self::Position | Self::Rotation | Self::Scale)
    }

    /// The value a freshly allocated node holds for this property.
    #[must_use]
    pub const fn default_value(self) -> Vec4 {
        match self {
            Self::Scale | Self::Color => Vec4::ONE,
            Self::Outline | Self::Shadow => Vec4::new(0.0, 0.0, 0.0, 1.0),
            Self::FillAngle => Vec4::new(360.0, 0.0, 0.0, 0.0),
            _ => Vec4::ZERO,
        }
    }

    /// Default values for every property, indexed by id.
    #[must_use]
    pub const fn defaults() -> [Vec4; Self::COUNT] {
        let mut out = [Vec4::ZERO; Self::COUNT];
        let mut i = 0;
        while i < Self::COUNT {
            out[i] = Self::ALL[i].default_value();
            i += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_names_round_trip() {
        for p in Property::ALL {
            assert_eq!(Property::from_id(p.id()), Some(p));
            assert_eq!(Property::from_name(p.name()), Some(p));
        }
        assert_eq!(Property::from_id(10), None);
        assert_eq!(Property::from_name("opacity"), None);
    }

    #[test]
    fn type_specific_properties() {
        assert!(NodeType::Box.supports(Property::Slice9));
        assert!(!NodeType::Text.supports(Property::Slice9));
        assert!(NodeType::Pie.supports(Property::FillAngle));
        assert!(NodeType::Pie.supports(Property::InnerRadius));
        assert!(!NodeType::Box.supports(Property::InnerRadius));
        assert!(NodeType::Bone.supports(Property::Color));
    }

    #[test]
    fn defaults_are_sensible() {
        let d = Property::defaults();
        assert_eq!(d[Property::Scale.id() as usize], Vec4::ONE);
        assert_eq!(d[Property::Position.id() as usize], Vec4::ZERO);
        assert_eq!(d[Property::FillAngle.id() as usize].x, 360.0);
    }
}
