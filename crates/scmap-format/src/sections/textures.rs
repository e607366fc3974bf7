use crate::error::MapError;
use crate::stream::{string_len, ByteReader, ByteWriter};

/// A named environment cubemap used for terrain reflections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cubemap {
    pub name: String,
    pub path: String,
}

/// Terrain shader selection and the environment textures it samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Textures {
    pub terrain_shader: String,
    pub background_path: String,
    pub sky_cubemap_path: String,
    pub cubemaps: Vec<Cubemap>,
}

impl Textures {
    pub fn create() -> Self {
        Self {
            terrain_shader: "TTerrainXP".into(),
            background_path: "/textures/environment/defaultbackground.dds".into(),
            sky_cubemap_path: "/textures/environment/defaultskycube.dds".into(),
            cubemaps: vec![Cubemap {
                name: "<default>".into(),
                path: "/textures/environment/defaultenvcube.dds".into(),
            }],
        }
    }

    pub fn encoded_len(&self) -> usize {
        string_len(&self.terrain_shader)
            + string_len(&self.background_path)
            + string_len(&self.sky_cubemap_path)
            + 4
            + self
                .cubemaps
                .iter()
                .map(|c| string_len(&c.name) + string_len(&c.path))
                .sum::<usize>()
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let terrain_shader = r.read_string()?;
        let background_path = r.read_string()?;
        let sky_cubemap_path = r.read_string()?;
        let count = r.read_u32()?;
        let mut cubemaps = Vec::new();
        for _ in 0..count {
            cubemaps.push(Cubemap {
                name: r.read_string()?,
                path: r.read_string()?,
            });
        }
        Ok(Self {
            terrain_shader,
            background_path,
            sky_cubemap_path,
            cubemaps,
        })
    }

    pub fn save(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_string(&self.terrain_shader);
        w.write_string(&self.background_path);
        w.write_string(&self.sky_cubemap_path);
        w.write_u32(self.cubemaps.len() as u32);
        for cubemap in &self.cubemaps {
            w.write_string(&cubemap.name);
            w.write_string(&cubemap.path);
        }
        w.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(textures: &Textures) -> Textures {
        let bytes = textures.save();
        assert_eq!(bytes.len(), textures.encoded_len());
        let mut r = ByteReader::new(&bytes);
        let loaded = Textures::load(&mut r).expect("load");
        assert!(r.is_empty());
        loaded
    }

    #[test]
    fn test_default_textures_roundtrip() {
        let textures = Textures::create();
        assert_eq!(roundtrip(&textures), textures);
    }

    #[test]
    fn test_no_cubemaps_roundtrip() {
        let textures = Textures {
            cubemaps: Vec::new(),
            ..Textures::create()
        };
        let bytes = textures.save();
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
        assert_eq!(roundtrip(&textures), textures);
    }

    #[test]
    fn test_missing_terminator_is_eof() {
        let result = Textures::load(&mut ByteReader::new(b"TTerrain"));
        assert!(matches!(result, Err(MapError::UnexpectedEof { .. })));
    }
}
