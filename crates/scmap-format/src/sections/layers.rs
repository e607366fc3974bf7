use scmap_core::constants::{ALBEDO_LAYER_COUNT, NORMAL_LAYER_COUNT};

use super::read_array;
use crate::error::MapError;
use crate::stream::{string_len, ByteReader, ByteWriter};

/// A terrain stratum texture and how often it tiles across the map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    pub path: String,
    pub scale: f32,
}

impl Layer {
    fn new(path: &str) -> Self {
        Self {
            path: path.into(),
            scale: 4.0,
        }
    }

    fn encoded_len(&self) -> usize {
        string_len(&self.path) + 4
    }

    fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        Ok(Self {
            path: r.read_string()?,
            scale: r.read_f32()?,
        })
    }

    fn save(&self, w: &mut ByteWriter) {
        w.write_string(&self.path);
        w.write_f32(self.scale);
    }
}

/// Albedo and normal strata blended by the texturemap channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Layers {
    pub albedo: [Layer; ALBEDO_LAYER_COUNT],
    pub normal: [Layer; NORMAL_LAYER_COUNT],
    /// Two words after the normal layers. Zero in every shipped map.
    pub reserved: [u32; 2],
}

impl Layers {
    pub fn create() -> Self {
        let mut albedo: [Layer; ALBEDO_LAYER_COUNT] = std::array::from_fn(|_| Layer::new(""));
        let mut normal: [Layer; NORMAL_LAYER_COUNT] = std::array::from_fn(|_| Layer::new(""));
        albedo[0] = Layer::new("/env/evergreen/layers/rockmed_albedo.dds");
        normal[0] = Layer::new("/env/evergreen/layers/SandLight_normals.dds");
        Self {
            albedo,
            normal,
            reserved: [0; 2],
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.albedo
            .iter()
            .chain(self.normal.iter())
            .map(Layer::encoded_len)
            .sum::<usize>()
            + 8
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let albedo = read_array(r, Layer::load)?;
        let normal = read_array(r, Layer::load)?;
        let reserved = [r.read_u32()?, r.read_u32()?];
        if reserved != [0; 2] {
            log::debug!("layers reserved words are {reserved:?}");
        }
        Ok(Self {
            albedo,
            normal,
            reserved,
        })
    }

    pub fn save(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        for layer in self.albedo.iter().chain(self.normal.iter()) {
            layer.save(&mut w);
        }
        for word in self.reserved {
            w.write_u32(word);
        }
        w.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layers_roundtrip() {
        let layers = Layers::create();
        let bytes = layers.save();
        assert_eq!(bytes.len(), layers.encoded_len());

        let mut r = ByteReader::new(&bytes);
        let loaded = Layers::load(&mut r).expect("load");
        assert!(r.is_empty());
        assert_eq!(loaded, layers);
    }

    #[test]
    fn test_layer_counts() {
        let layers = Layers::create();
        assert_eq!(layers.albedo.len(), 10);
        assert_eq!(layers.normal.len(), 9);
        assert!(layers.albedo[1..].iter().all(|l| l.path.is_empty()));
        assert!(layers.albedo.iter().all(|l| l.scale == 4.0));
    }

    #[test]
    fn test_empty_layers_are_five_bytes_each() {
        let layers = Layers {
            albedo: std::array::from_fn(|_| Layer::default()),
            normal: std::array::from_fn(|_| Layer::default()),
            reserved: [0; 2],
        };
        assert_eq!(layers.save().len(), 19 * 5 + 8);
    }
}
