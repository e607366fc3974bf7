use glam::{Vec2, Vec3, Vec4};
use scmap_core::checks;
use scmap_core::constants::WAVE_TEXTURE_COUNT;

use super::read_array;
use crate::error::MapError;
use crate::stream::{string_len, ByteReader, ByteWriter};

/// One scrolling normal texture layered over the water surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaveTexture {
    pub movement: Vec2,
    pub path: String,
}

impl WaveTexture {
    fn encoded_len(&self) -> usize {
        8 + string_len(&self.path)
    }
}

/// Shoreline wave emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveGenerator {
    pub texture_path: String,
    pub ramp_path: String,
    pub position: Vec3,
    pub rotation: f32,
    pub velocity: Vec3,
    pub lifetime: Vec2,
    pub period: Vec2,
    pub scale: Vec2,
    pub frame_count: f32,
    pub frame_rate: Vec2,
    pub strip_count: f32,
}

impl WaveGenerator {
    /// Fixed float payload, excluding the two strings.
    const FLOAT_LEN: usize = 17 * 4;

    fn encoded_len(&self) -> usize {
        string_len(&self.texture_path) + string_len(&self.ramp_path) + Self::FLOAT_LEN
    }

    fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        Ok(Self {
            texture_path: r.read_string()?,
            ramp_path: r.read_string()?,
            position: r.read_vec3()?,
            rotation: r.read_f32()?,
            velocity: r.read_vec3()?,
            lifetime: r.read_vec2()?,
            period: r.read_vec2()?,
            scale: r.read_vec2()?,
            frame_count: r.read_f32()?,
            frame_rate: r.read_vec2()?,
            strip_count: r.read_f32()?,
        })
    }

    fn save(&self, w: &mut ByteWriter) {
        w.write_string(&self.texture_path);
        w.write_string(&self.ramp_path);
        w.write_vec3(self.position);
        w.write_f32(self.rotation);
        w.write_vec3(self.velocity);
        w.write_vec2(self.lifetime);
        w.write_vec2(self.period);
        w.write_vec2(self.scale);
        w.write_f32(self.frame_count);
        w.write_vec2(self.frame_rate);
        w.write_f32(self.strip_count);
    }
}

/// Water plane, its optical constants and shoreline waves.
///
/// Elevations must satisfy `abyss <= deep <= elevation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Water {
    pub has_water: bool,
    pub elevation: f32,
    pub elevation_deep: f32,
    pub elevation_abyss: f32,

    pub surface_colour: Vec3,
    pub colour_lerp: Vec2,
    pub refraction_scale: f32,
    pub fresnel_bias: f32,
    pub fresnel_power: f32,
    pub unit_reflection: f32,
    pub sky_reflection: f32,
    pub sun_shininess: f32,
    pub sun_strength: f32,
    pub sun_direction: Vec3,
    pub sun_colour: Vec3,
    pub sun_reflection: f32,
    pub sun_glow: f32,

    pub cubemap_path: String,
    pub ramp_path: String,
    pub normal_repeats: Vec4,
    pub wave_textures: [WaveTexture; WAVE_TEXTURE_COUNT],
    pub wave_generators: Vec<WaveGenerator>,
}

const WAVE_MOVEMENTS: [Vec2; WAVE_TEXTURE_COUNT] = [
    Vec2::new(0.5, -0.95),
    Vec2::new(0.05, -0.095),
    Vec2::new(0.01, 0.03),
    Vec2::new(0.0005, 0.0009),
];

impl Water {
    pub fn create() -> Self {
        Self {
            has_water: true,
            elevation: 17.5,
            elevation_deep: 15.0,
            elevation_abyss: 2.5,
            surface_colour: Vec3::new(0.0, 0.7, 1.5),
            colour_lerp: Vec2::new(0.064, 0.119),
            refraction_scale: 0.375,
            fresnel_bias: 0.15,
            fresnel_power: 1.5,
            unit_reflection: 0.5,
            sky_reflection: 1.5,
            sun_shininess: 50.0,
            sun_strength: 10.0,
            sun_direction: Vec3::new(0.099_548, -0.962_631, 0.251_857),
            sun_colour: Vec3::new(0.8125, 0.710_937_5, 0.5),
            sun_reflection: 5.0,
            sun_glow: 0.1,
            cubemap_path: "/textures/engine/waterCubemap.dds".into(),
            ramp_path: "/textures/engine/waterramp.dds".into(),
            normal_repeats: Vec4::new(0.0009, 0.009, 0.05, 0.5),
            wave_textures: WAVE_MOVEMENTS.map(|movement| WaveTexture {
                movement,
                path: "/textures/engine/waves.dds".into(),
            }),
            wave_generators: Vec::new(),
        }
    }

    /// Check the flag and elevation ordering.
    pub fn validate(&self) -> Result<(), MapError> {
        checks::between(
            "water.elevation_deep",
            self.elevation_deep,
            self.elevation_abyss,
            self.elevation,
        )?;
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        1 + 3 * 4
            + 12 + 8 + 7 * 4 + 12 + 12 + 2 * 4
            + string_len(&self.cubemap_path)
            + string_len(&self.ramp_path)
            + 16
            + self.wave_textures.iter().map(WaveTexture::encoded_len).sum::<usize>()
            + 4
            + self
                .wave_generators
                .iter()
                .map(WaveGenerator::encoded_len)
                .sum::<usize>()
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let flag = r.read_u8()?;
        checks::one_of("water.has_water", flag, &[0, 1])?;

        let elevation = r.read_f32()?;
        let elevation_deep = r.read_f32()?;
        let elevation_abyss = r.read_f32()?;

        let surface_colour = r.read_vec3()?;
        let colour_lerp = r.read_vec2()?;
        let refraction_scale = r.read_f32()?;
        let fresnel_bias = r.read_f32()?;
        let fresnel_power = r.read_f32()?;
        let unit_reflection = r.read_f32()?;
        let sky_reflection = r.read_f32()?;
        let sun_shininess = r.read_f32()?;
        let sun_strength = r.read_f32()?;
        let sun_direction = r.read_vec3()?;
        let sun_colour = r.read_vec3()?;
        let sun_reflection = r.read_f32()?;
        let sun_glow = r.read_f32()?;

        let cubemap_path = r.read_string()?;
        let ramp_path = r.read_string()?;
        let normal_repeats = r.read_vec4()?;

        let wave_textures = read_array(r, |r| {
            Ok(WaveTexture {
                movement: r.read_vec2()?,
                path: r.read_string()?,
            })
        })?;

        let count = r.read_u32()?;
        let mut wave_generators = Vec::new();
        for _ in 0..count {
            wave_generators.push(WaveGenerator::load(r)?);
        }

        let water = Self {
            has_water: flag == 1,
            elevation,
            elevation_deep,
            elevation_abyss,
            surface_colour,
            colour_lerp,
            refraction_scale,
            fresnel_bias,
            fresnel_power,
            unit_reflection,
            sky_reflection,
            sun_shininess,
            sun_strength,
            sun_direction,
            sun_colour,
            sun_reflection,
            sun_glow,
            cubemap_path,
            ramp_path,
            normal_repeats,
            wave_textures,
            wave_generators,
        };
        water.validate()?;
        Ok(water)
    }

    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        self.validate()?;
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_u8(self.has_water as u8);
        w.write_f32(self.elevation);
        w.write_f32(self.elevation_deep);
        w.write_f32(self.elevation_abyss);

        w.write_vec3(self.surface_colour);
        w.write_vec2(self.colour_lerp);
        w.write_f32(self.refraction_scale);
        w.write_f32(self.fresnel_bias);
        w.write_f32(self.fresnel_power);
        w.write_f32(self.unit_reflection);
        w.write_f32(self.sky_reflection);
        w.write_f32(self.sun_shininess);
        w.write_f32(self.sun_strength);
        w.write_vec3(self.sun_direction);
        w.write_vec3(self.sun_colour);
        w.write_f32(self.sun_reflection);
        w.write_f32(self.sun_glow);

        w.write_string(&self.cubemap_path);
        w.write_string(&self.ramp_path);
        w.write_vec4(self.normal_repeats);
        for texture in &self.wave_textures {
            w.write_vec2(texture.movement);
            w.write_string(&texture.path);
        }

        w.write_u32(self.wave_generators.len() as u32);
        for generator in &self.wave_generators {
            generator.save(&mut w);
        }
        Ok(w.into_inner())
    }
}
