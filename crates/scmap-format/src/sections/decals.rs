use glam::Vec3;
use scmap_core::checks;
use scmap_core::constants::MAX_ARMY_INDEX;

use crate::error::MapError;
use crate::stream::{sized_string_len, string_len, ByteReader, ByteWriter};

/// Most decal kinds carry a single texture; normal-plus-albedo pairs carry two.
pub const MAX_DECAL_TEXTURES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DecalType {
    Albedo = 1,
    Normals = 2,
    WaterMask = 3,
    WaterAlbedo = 4,
    WaterNormals = 5,
    Glow = 6,
    NormalsAlpha = 7,
    GlowMask = 8,
}

impl DecalType {
    pub const ALL: [DecalType; 8] = [
        DecalType::Albedo,
        DecalType::Normals,
        DecalType::WaterMask,
        DecalType::WaterAlbedo,
        DecalType::WaterNormals,
        DecalType::Glow,
        DecalType::NormalsAlpha,
        DecalType::GlowMask,
    ];

    pub fn from_u32(value: u32) -> Result<Self, MapError> {
        checks::between("decal.type", value, 1, 8)?;
        Ok(Self::ALL[value as usize - 1])
    }
}

/// A projected texture placed on the terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct Decal {
    pub id: u32,
    pub kind: DecalType,
    pub textures: Vec<String>,
    pub scale: Vec3,
    pub position: Vec3,
    pub rotation: Vec3,
    pub cut_off_lod: f32,
    pub near_cut_off_lod: f32,
    /// Army that owns the decal, or -1 for none.
    pub owner_army: i32,
}

impl Decal {
    fn encoded_len(&self) -> usize {
        4 + 4
            + 4
            + self.textures.iter().map(|t| sized_string_len(t)).sum::<usize>()
            + 3 * 12
            + 8
            + 4
    }

    fn validate(&self) -> Result<(), MapError> {
        checks::between("decal.textures", self.textures.len(), 0, MAX_DECAL_TEXTURES)?;
        checks::between("decal.owner_army", self.owner_army, -1, MAX_ARMY_INDEX)?;
        Ok(())
    }

    fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let id = r.read_u32()?;
        let kind = DecalType::from_u32(r.read_u32()?)?;
        let count = r.read_u32()? as usize;
        checks::between("decal.textures", count, 0, MAX_DECAL_TEXTURES)?;
        let mut textures = Vec::with_capacity(count);
        for _ in 0..count {
            textures.push(r.read_sized_string()?);
        }
        let decal = Self {
            id,
            kind,
            textures,
            scale: r.read_vec3()?,
            position: r.read_vec3()?,
            rotation: r.read_vec3()?,
            cut_off_lod: r.read_f32()?,
            near_cut_off_lod: r.read_f32()?,
            owner_army: r.read_i32()?,
        };
        decal.validate()?;
        Ok(decal)
    }

    fn save(&self, w: &mut ByteWriter) -> Result<(), MapError> {
        self.validate()?;
        w.write_u32(self.id);
        w.write_u32(self.kind as u32);
        w.write_u32(self.textures.len() as u32);
        for texture in &self.textures {
            w.write_sized_string(texture);
        }
        w.write_vec3(self.scale);
        w.write_vec3(self.position);
        w.write_vec3(self.rotation);
        w.write_f32(self.cut_off_lod);
        w.write_f32(self.near_cut_off_lod);
        w.write_i32(self.owner_army);
        Ok(())
    }
}

/// Named selection of decals, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecalGroup {
    pub id: u32,
    pub name: String,
    pub decal_ids: Vec<u32>,
}

impl DecalGroup {
    fn encoded_len(&self) -> usize {
        4 + string_len(&self.name) + 4 + self.decal_ids.len() * 4
    }

    fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let id = r.read_u32()?;
        let name = r.read_string()?;
        let count = r.read_u32()?;
        let mut decal_ids = Vec::new();
        for _ in 0..count {
            decal_ids.push(r.read_u32()?);
        }
        Ok(Self {
            id,
            name,
            decal_ids,
        })
    }

    fn save(&self, w: &mut ByteWriter) {
        w.write_u32(self.id);
        w.write_string(&self.name);
        w.write_u32(self.decal_ids.len() as u32);
        for &id in &self.decal_ids {
            w.write_u32(id);
        }
    }
}

/// Decals followed by decal groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decals {
    pub decals: Vec<Decal>,
    pub groups: Vec<DecalGroup>,
}

impl Decals {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn encoded_len(&self) -> usize {
        4 + self.decals.iter().map(Decal::encoded_len).sum::<usize>()
            + 4
            + self.groups.iter().map(DecalGroup::encoded_len).sum::<usize>()
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let count = r.read_u32()?;
        let mut decals = Vec::new();
        for _ in 0..count {
            decals.push(Decal::load(r)?);
        }
        let count = r.read_u32()?;
        let mut groups = Vec::new();
        for _ in 0..count {
            groups.push(DecalGroup::load(r)?);
        }
        Ok(Self { decals, groups })
    }

    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_u32(self.decals.len() as u32);
        for decal in &self.decals {
            decal.save(&mut w)?;
        }
        w.write_u32(self.groups.len() as u32);
        for group in &self.groups {
            group.save(&mut w);
        }
        Ok(w.into_inner())
    }
}
