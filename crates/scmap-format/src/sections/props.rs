use glam::Vec3;

use crate::error::MapError;
use crate::stream::{string_len, ByteReader, ByteWriter};

/// A placed prop: trees, rocks, wreckage.
///
/// Orientation is stored as three basis vectors rather than angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub blueprint_path: String,
    pub position: Vec3,
    pub rotation_x: Vec3,
    pub rotation_y: Vec3,
    pub rotation_z: Vec3,
    pub scale: Vec3,
}

impl Prop {
    fn encoded_len(&self) -> usize {
        string_len(&self.blueprint_path) + 5 * 12
    }

    fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        Ok(Self {
            blueprint_path: r.read_string()?,
            position: r.read_vec3()?,
            rotation_x: r.read_vec3()?,
            rotation_y: r.read_vec3()?,
            rotation_z: r.read_vec3()?,
            scale: r.read_vec3()?,
        })
    }

    fn save(&self, w: &mut ByteWriter) {
        w.write_string(&self.blueprint_path);
        w.write_vec3(self.position);
        w.write_vec3(self.rotation_x);
        w.write_vec3(self.rotation_y);
        w.write_vec3(self.rotation_z);
        w.write_vec3(self.scale);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Props {
    pub props: Vec<Prop>,
}

impl Props {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn encoded_len(&self) -> usize {
        4 + self.props.iter().map(Prop::encoded_len).sum::<usize>()
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let count = r.read_u32()?;
        let mut props = Vec::new();
        for _ in 0..count {
            props.push(Prop::load(r)?);
        }
        Ok(Self { props })
    }

    pub fn save(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_u32(self.props.len() as u32);
        for prop in &self.props {
            prop.save(&mut w);
        }
        w.into_inner()
    }
}
