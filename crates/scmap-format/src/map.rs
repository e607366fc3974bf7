use scmap_core::constants::{MAP_VERSION_MAJOR, MAP_VERSION_MINOR};
use scmap_core::SizeClass;

use crate::args::MapArgs;
use crate::error::MapError;
use crate::sections::*;
use crate::stream::ByteReader;

/// A complete v56 map: the twelve sections in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub header: Header,
    pub preview: PreviewImage,
    pub heightmap: Heightmap,
    pub textures: Textures,
    pub lighting: Lighting,
    pub water: Water,
    pub layers: Layers,
    pub decals: Decals,
    pub normalmap: Normalmap,
    pub texturemap: Texturemap,
    pub watermap: Watermap,
    pub props: Props,
}

/// Decode one section and check it consumed exactly its encoded length.
///
/// Any failure is wrapped with the section name, the byte where the section
/// started and the byte where decoding stopped.
fn read_section<T>(
    r: &mut ByteReader,
    section: &'static str,
    load: impl FnOnce(&mut ByteReader) -> Result<T, MapError>,
    encoded_len: impl FnOnce(&T) -> usize,
) -> Result<T, MapError> {
    let start = r.position();
    let wrap = |offset: usize, source: MapError| MapError::Section {
        section,
        start,
        offset,
        source: Box::new(source),
    };

    let value = match load(r) {
        Ok(value) => value,
        Err(e) => return Err(wrap(r.position(), e)),
    };

    let consumed = r.position() - start;
    let expected = encoded_len(&value);
    if consumed != expected {
        return Err(wrap(
            r.position(),
            MapError::LengthMismatch {
                field: section,
                expected,
                actual: consumed,
            },
        ));
    }
    log::debug!("{section}: {consumed} bytes at offset {start}");
    Ok(value)
}

fn read_minor_version(r: &mut ByteReader) -> Result<u32, MapError> {
    let minor = r.read_u32()?;
    if minor != MAP_VERSION_MINOR {
        return Err(MapError::UnsupportedVersion {
            major: MAP_VERSION_MAJOR,
            minor,
        });
    }
    Ok(minor)
}

impl Map {
    /// Build a new map with every section at its default.
    pub fn create(args: &MapArgs) -> Result<Self, MapError> {
        args.validate()?;
        let size = args.size;
        let dim = size.dimension();
        log::info!(
            "creating map \"{}\" ({dim}x{dim}, default height {})",
            args.name,
            args.default_height
        );

        Ok(Self {
            header: Header::create(size),
            preview: PreviewImage::create(),
            heightmap: Heightmap::create(size, args.default_height),
            textures: Textures::create(),
            lighting: Lighting::create(),
            water: Water::create(),
            layers: Layers::create(),
            decals: Decals::create(),
            normalmap: Normalmap::create(size),
            texturemap: Texturemap::create(size),
            watermap: Watermap::create(size),
            props: Props::create(),
        })
    }

    pub fn size_class(&self) -> Result<SizeClass, MapError> {
        self.heightmap.size_class()
    }

    /// Parse a whole map file. Nothing is returned unless every section
    /// decodes and the file ends exactly after the props.
    pub fn load(bytes: &[u8]) -> Result<Self, MapError> {
        let r = &mut ByteReader::new(bytes);

        let header = read_section(r, "header", Header::load, Header::encoded_len)?;
        let preview = read_section(r, "preview", PreviewImage::load, PreviewImage::encoded_len)?;
        read_section(r, "version", read_minor_version, |_| 4)?;
        let heightmap = read_section(
            r,
            "heightmap",
            |r| {
                let heightmap = Heightmap::load(r)?;
                check_dimensions(
                    "header",
                    header.width,
                    header.height,
                    heightmap.width(),
                    heightmap.height(),
                )?;
                Ok(heightmap)
            },
            Heightmap::encoded_len,
        )?;
        let (hm_width, hm_height) = (heightmap.width(), heightmap.height());
        let textures = read_section(r, "textures", Textures::load, Textures::encoded_len)?;
        let lighting = read_section(r, "lighting", Lighting::load, Lighting::encoded_len)?;
        let water = read_section(r, "water", Water::load, Water::encoded_len)?;
        let layers = read_section(r, "layers", Layers::load, Layers::encoded_len)?;
        let decals = read_section(r, "decals", Decals::load, Decals::encoded_len)?;
        let normalmap = read_section(
            r,
            "normalmap",
            |r| {
                let normalmap = Normalmap::load(r)?;
                check_dimensions(
                    "normalmap",
                    normalmap.width(),
                    normalmap.height(),
                    hm_width,
                    hm_height,
                )?;
                Ok(normalmap)
            },
            Normalmap::encoded_len,
        )?;

        // Texturemap and watermap take their resolution from the heightmap
        let texturemap = read_section(
            r,
            "texturemap",
            |r| Texturemap::load(r, hm_width, hm_height),
            Texturemap::encoded_len,
        )?;
        let watermap = read_section(
            r,
            "watermap",
            |r| Watermap::load(r, hm_width, hm_height),
            Watermap::encoded_len,
        )?;
        let props = read_section(r, "props", Props::load, Props::encoded_len)?;

        if !r.is_empty() {
            return Err(MapError::TrailingData(r.remaining()));
        }

        // Every cross-section constraint was checked inside its section above
        let map = Self {
            header,
            preview,
            heightmap,
            textures,
            lighting,
            water,
            layers,
            decals,
            normalmap,
            texturemap,
            watermap,
            props,
        };
        log::info!(
            "loaded {}x{} map: {} decals, {} props, {} wave generators",
            hm_width,
            hm_height,
            map.decals.decals.len(),
            map.props.props.len(),
            map.water.wave_generators.len()
        );
        Ok(map)
    }

    /// Check that every raster agrees with the heightmap resolution.
    pub fn validate(&self) -> Result<(), MapError> {
        let (width, height) = (self.heightmap.width(), self.heightmap.height());
        let dims = [
            ("header", self.header.width, self.header.height, width, height),
            (
                "normalmap",
                self.normalmap.width(),
                self.normalmap.height(),
                width,
                height,
            ),
            (
                "texturemap",
                self.texturemap.width(),
                self.texturemap.height(),
                width / 2,
                height / 2,
            ),
            (
                "watermap",
                self.watermap.width(),
                self.watermap.height(),
                width / 2,
                height / 2,
            ),
        ];
        for (field, w, h, expected_w, expected_h) in dims {
            check_dimensions(field, w, h, expected_w, expected_h)?;
        }
        self.watermap.validate()?;
        self.water.validate()?;
        Ok(())
    }

    /// Total file size `save` will produce.
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len()
            + self.preview.encoded_len()
            + 4
            + self.heightmap.encoded_len()
            + self.textures.encoded_len()
            + self.lighting.encoded_len()
            + self.water.encoded_len()
            + self.layers.encoded_len()
            + self.decals.encoded_len()
            + self.normalmap.encoded_len()
            + self.texturemap.encoded_len()
            + self.watermap.encoded_len()
            + self.props.encoded_len()
    }

    /// Serialize every section in file order.
    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        self.validate()?;

        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.header.save());
        out.extend_from_slice(&self.preview.save()?);
        out.extend_from_slice(&MAP_VERSION_MINOR.to_le_bytes());
        out.extend_from_slice(&self.heightmap.save());
        out.extend_from_slice(&self.textures.save());
        out.extend_from_slice(&self.lighting.save());
        out.extend_from_slice(&self.water.save()?);
        out.extend_from_slice(&self.layers.save());
        out.extend_from_slice(&self.decals.save()?);
        out.extend_from_slice(&self.normalmap.save()?);
        out.extend_from_slice(&self.texturemap.save()?);
        out.extend_from_slice(&self.watermap.save()?);
        out.extend_from_slice(&self.props.save());

        log::info!("saved map: {} bytes", out.len());
        Ok(out)
    }
}
