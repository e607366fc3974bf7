use glam::{Vec3, Vec4};

use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// Sun, ambient and fog parameters for terrain and units.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub multiplier: f32,
    pub sun_direction: Vec3,
    pub sun_ambience: Vec3,
    pub sun_colour: Vec3,
    pub shadow_fill_colour: Vec3,
    pub specular_colour: Vec4,
    pub bloom: f32,
    pub fog_colour: Vec3,
    pub fog_start: f32,
    pub fog_end: f32,
}

impl Lighting {
    /// 23 little-endian floats.
    pub const ENCODED_LEN: usize = scmap_core::constants::LIGHTING_FLOAT_COUNT * 4;

    pub fn create() -> Self {
        Self {
            multiplier: 1.5,
            sun_direction: Vec3::new(0.707, 0.707, 0.0),
            sun_ambience: Vec3::splat(0.2),
            sun_colour: Vec3::splat(1.2),
            shadow_fill_colour: Vec3::new(0.7, 0.7, 0.75),
            specular_colour: Vec4::ZERO,
            bloom: 0.08,
            fog_colour: Vec3::new(0.37, 0.49, 0.45),
            fog_start: 0.0,
            fog_end: 1000.0,
        }
    }

    pub fn encoded_len(&self) -> usize {
        Self::ENCODED_LEN
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        Ok(Self {
            multiplier: r.read_f32()?,
            sun_direction: r.read_vec3()?,
            sun_ambience: r.read_vec3()?,
            sun_colour: r.read_vec3()?,
            shadow_fill_colour: r.read_vec3()?,
            specular_colour: r.read_vec4()?,
            bloom: r.read_f32()?,
            fog_colour: r.read_vec3()?,
            fog_start: r.read_f32()?,
            fog_end: r.read_f32()?,
        })
    }

    pub fn save(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(Self::ENCODED_LEN);
        w.write_f32(self.multiplier);
        w.write_vec3(self.sun_direction);
        w.write_vec3(self.sun_ambience);
        w.write_vec3(self.sun_colour);
        w.write_vec3(self.shadow_fill_colour);
        w.write_vec4(self.specular_colour);
        w.write_f32(self.bloom);
        w.write_vec3(self.fog_colour);
        w.write_f32(self.fog_start);
        w.write_f32(self.fog_end);
        w.into_inner()
    }
}
