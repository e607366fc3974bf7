use std::path::Path;

use scmap_format::Map;

/// Headline facts about a map, printed as markdown or saved as JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapSummary {
    pub size_class: u8,
    pub width: u32,
    pub height: u32,
    pub height_scale: f32,
    pub min_height: u16,
    pub max_height: u16,
    pub terrain_shader: String,
    pub cubemaps: usize,
    pub has_water: bool,
    pub water_elevation: f32,
    pub wave_generators: usize,
    pub albedo_layers: usize,
    pub decals: usize,
    pub decal_groups: usize,
    pub props: usize,
    pub encoded_bytes: usize,
}

pub fn summarize(map: &Map) -> MapSummary {
    let samples = map.heightmap.samples();
    let used_layers = map
        .layers
        .albedo
        .iter()
        .filter(|l| !l.path.is_empty())
        .count();

    MapSummary {
        size_class: map.size_class().map(u8::from).unwrap_or(u8::MAX),
        width: map.heightmap.width(),
        height: map.heightmap.height(),
        height_scale: map.heightmap.scale(),
        min_height: samples.iter().copied().min().unwrap_or(0),
        max_height: samples.iter().copied().max().unwrap_or(0),
        terrain_shader: map.textures.terrain_shader.clone(),
        cubemaps: map.textures.cubemaps.len(),
        has_water: map.water.has_water,
        water_elevation: map.water.elevation,
        wave_generators: map.water.wave_generators.len(),
        albedo_layers: used_layers,
        decals: map.decals.decals.len(),
        decal_groups: map.decals.groups.len(),
        props: map.props.props.len(),
        encoded_bytes: map.encoded_len(),
    }
}

/// Format a summary as a two-column markdown table.
pub fn format_markdown(summary: &MapSummary) -> String {
    let rows = [
        ("Size class", summary.size_class.to_string()),
        ("Extent", format!("{}x{}", summary.width, summary.height)),
        ("Height scale", format!("{:.6}", summary.height_scale)),
        (
            "Height range",
            format!("{}..{}", summary.min_height, summary.max_height),
        ),
        ("Terrain shader", summary.terrain_shader.clone()),
        ("Cubemaps", summary.cubemaps.to_string()),
        (
            "Water",
            if summary.has_water {
                format!("yes, elevation {:.2}", summary.water_elevation)
            } else {
                "no".to_string()
            },
        ),
        ("Wave generators", summary.wave_generators.to_string()),
        ("Albedo layers", summary.albedo_layers.to_string()),
        (
            "Decals",
            format!("{} in {} groups", summary.decals, summary.decal_groups),
        ),
        ("Props", summary.props.to_string()),
        ("Encoded size", format!("{} bytes", summary.encoded_bytes)),
    ];

    let mut out = String::new();
    out.push_str("| Field | Value |\n");
    out.push_str("|-------|-------|\n");
    for (field, value) in rows {
        out.push_str(&format!("| {} | {} |\n", field, value));
    }
    out
}

/// Save a summary to a JSON file.
pub fn save_report(path: &Path, summary: &MapSummary) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Entries of [`section_diffs`] holding DXT5 pixels, which may shift by a
/// quantisation step when re-encoded.
pub const LOSSY_SECTIONS: [&str; 2] = ["normalmap", "watermap.image"];

/// Names of the sections that differ between two maps. The watermap image is
/// reported apart from its raw masks.
pub fn section_diffs(a: &Map, b: &Map) -> Vec<&'static str> {
    let (wa, wb) = (&a.watermap, &b.watermap);
    let checks = [
        ("header", a.header == b.header),
        ("preview", a.preview == b.preview),
        ("heightmap", a.heightmap == b.heightmap),
        ("textures", a.textures == b.textures),
        ("lighting", a.lighting == b.lighting),
        ("water", a.water == b.water),
        ("layers", a.layers == b.layers),
        ("decals", a.decals == b.decals),
        ("normalmap", a.normalmap == b.normalmap),
        ("texturemap", a.texturemap == b.texturemap),
        (
            "watermap",
            wa.foam == wb.foam
                && wa.flatness == wb.flatness
                && wa.depth_bias == wb.depth_bias
                && wa.terrain_type == wb.terrain_type,
        ),
        ("watermap.image", wa.image == wb.image),
        ("props", a.props == b.props),
    ];
    checks
        .into_iter()
        .filter(|(_, same)| !same)
        .map(|(name, _)| name)
        .collect()
}
