//! Placeholder handle types for the cast-member image/palette slots.
//!
//! Bitmap decoding and palette resolution are out of scope; these keep
//! `Datum::BitmapRef`/`Datum::PaletteRef`/`Datum::Matte` structurally valid
//! so scripts can still hold, pass around, and compare opaque image
//! handles without the engine actually decoding pixel data.

use crate::player::cast_lib::CastMemberRef;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct BitmapRef(pub u32);

#[derive(Clone, PartialEq, Debug)]
pub enum PaletteRef {
    BuiltIn(u8),
    Member(CastMemberRef),
}

impl Default for PaletteRef {
    fn default() -> Self {
        PaletteRef::BuiltIn(0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct BitmapMask {
    pub width: u16,
    pub height: u16,
}
