//! Binary glTF (GLB) scene export
//!
//! Turns an [`IndexedPolyhedron`] into a self-contained GLB scene: one mesh
//! with one primitive per distinct face color, a material per primitive, two
//! fixed directional lights and a single scene holding the lights and the
//! mesh node.

use crate::gltf::{
    Accessor, AccessorType, AlphaMode, Asset, Buffer, BufferView, Document, DocumentExtensions,
    GlbContainer, Light, LightType, LightsPunctual, Material, Mesh, Node, NodeExtensions,
    NodeLight, PbrMetallicRoughness, Primitive, Scene, COMPONENT_TYPE_FLOAT,
    COMPONENT_TYPE_UNSIGNED_INT, KHR_LIGHTS_PUNCTUAL, MODE_TRIANGLES, TARGET_ARRAY_BUFFER,
    TARGET_ELEMENT_ARRAY_BUFFER,
};
use crate::SceneWriter;
use byteorder::{LittleEndian, WriteBytesExt};
use scadview_core::{Color, Error, Face, IndexedPolyhedron, Interner, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Rotations of the two scene lights as `[x, y, z, w]` quaternions
pub const LIGHT_ROTATIONS: [[f32; 4]; 2] = [
    [-0.325_057_6, -0.325_057_6, 0.0, 0.888_073_9],
    [0.627_963_1, 0.627_963_1, 0.0, 0.459_700_9],
];

pub const METALLIC_FACTOR: f32 = 0.0;
pub const ROUGHNESS_FACTOR: f32 = 0.8;

/// Options for GLB export
#[derive(Debug, Clone)]
pub struct GlbExportOptions {
    /// Value written to `asset.generator`
    pub generator: String,
    /// Emit a `COLOR_0` attribute repeating the face color on every vertex
    pub vertex_colors: bool,
    /// Emit the two directional lights
    pub lights: bool,
}

impl Default for GlbExportOptions {
    fn default() -> Self {
        Self {
            generator: concat!("scadview ", env!("CARGO_PKG_VERSION")).to_string(),
            vertex_colors: false,
            lights: true,
        }
    }
}

impl GlbExportOptions {
    pub fn with_generator<S: Into<String>>(mut self, generator: S) -> Self {
        self.generator = generator.into();
        self
    }

    pub fn with_vertex_colors(mut self, enabled: bool) -> Self {
        self.vertex_colors = enabled;
        self
    }

    pub fn with_lights(mut self, enabled: bool) -> Self {
        self.lights = enabled;
        self
    }
}

/// Geometry of one color group, packed for a single primitive
///
/// `positions` holds only the vertices referenced by the group's faces, in
/// first-use order; `indices` refers to those packed positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedPrimitive {
    pub color_index: usize,
    pub color: Color,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl PackedPrimitive {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Per-component minimum and maximum of the positions
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for position in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
        (min, max)
    }
}

/// Group faces by color and pack each group's geometry.
///
/// Groups appear in the order their color is first used by a face.
pub fn pack_primitives(polyhedron: &IndexedPolyhedron) -> Result<Vec<PackedPrimitive>> {
    polyhedron.validate()?;

    let mut group_of_color: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<(usize, Vec<&Face>)> = Vec::new();
    for face in &polyhedron.faces {
        let group = *group_of_color.entry(face.color_index).or_insert_with(|| {
            groups.push((face.color_index, Vec::new()));
            groups.len() - 1
        });
        groups[group].1.push(face);
    }

    groups
        .into_iter()
        .map(|(color_index, faces)| pack_group(polyhedron, color_index, &faces))
        .collect()
}

fn pack_group(
    polyhedron: &IndexedPolyhedron,
    color_index: usize,
    faces: &[&Face],
) -> Result<PackedPrimitive> {
    let color = *polyhedron
        .colors
        .get(color_index)
        .ok_or_else(|| Error::invariant(format!("color {} out of range", color_index)))?;

    let mut remap: Interner<usize> = Interner::new();
    let mut indices = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        if face.vertices.len() < 3 {
            return Err(Error::invariant("face with fewer than 3 vertices"));
        }
        for triangle in face.triangles() {
            for vertex in triangle {
                let local = remap.intern(vertex);
                indices.push(
                    u32::try_from(local)
                        .map_err(|_| Error::invariant("primitive exceeds the u32 index range"))?,
                );
            }
        }
    }

    let positions = remap
        .as_slice()
        .iter()
        .map(|&i| {
            polyhedron
                .vertices
                .get(i)
                .map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .ok_or_else(|| Error::invariant(format!("vertex {} out of range", i)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PackedPrimitive {
        color_index,
        color,
        positions,
        indices,
    })
}

/// Accumulates the binary chunk and its buffer views
#[derive(Default)]
struct BinaryBuffer {
    data: Vec<u8>,
    views: Vec<BufferView>,
}

impl BinaryBuffer {
    fn push_f32s<I: IntoIterator<Item = f32>>(&mut self, values: I, target: u32) -> Result<usize> {
        let offset = self.data.len();
        for value in values {
            self.data.write_f32::<LittleEndian>(value)?;
        }
        Ok(self.finish_view(offset, target))
    }

    fn push_u32s(&mut self, values: &[u32], target: u32) -> Result<usize> {
        let offset = self.data.len();
        for &value in values {
            self.data.write_u32::<LittleEndian>(value)?;
        }
        Ok(self.finish_view(offset, target))
    }

    fn finish_view(&mut self, offset: usize, target: u32) -> usize {
        self.views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: self.data.len() - offset,
            target: Some(target),
        });
        self.views.len() - 1
    }
}

/// GLB exporter with configurable options
#[derive(Debug, Clone, Default)]
pub struct GlbExporter {
    pub options: GlbExportOptions,
}

impl GlbExporter {
    pub fn new(options: GlbExportOptions) -> Self {
        Self { options }
    }

    /// Export the polyhedron as GLB bytes
    pub fn export(&self, polyhedron: &IndexedPolyhedron) -> Result<Vec<u8>> {
        self.build(polyhedron)?.to_bytes()
    }

    /// Export the polyhedron and write the GLB to `path`
    pub fn write<P: AsRef<Path>>(&self, polyhedron: &IndexedPolyhedron, path: P) -> Result<()> {
        fs::write(path, self.export(polyhedron)?)?;
        Ok(())
    }

    /// Build the glTF document and binary chunk without serializing them
    pub fn build(&self, polyhedron: &IndexedPolyhedron) -> Result<GlbContainer> {
        let packed = pack_primitives(polyhedron)?;

        let mut buffer = BinaryBuffer::default();
        let mut accessors = Vec::new();
        let mut materials = Vec::new();
        let mut primitives = Vec::new();

        for primitive in &packed {
            debug!(
                color_index = primitive.color_index,
                vertices = primitive.vertex_count(),
                triangles = primitive.triangle_count(),
                "packed primitive"
            );

            let mut attributes = BTreeMap::new();

            let (min, max) = primitive.bounds();
            let view = buffer.push_f32s(
                primitive.positions.iter().flatten().copied(),
                TARGET_ARRAY_BUFFER,
            )?;
            accessors.push(Accessor {
                buffer_view: view,
                byte_offset: 0,
                component_type: COMPONENT_TYPE_FLOAT,
                count: primitive.vertex_count(),
                accessor_type: AccessorType::Vec3,
                min: Some(min.to_vec()),
                max: Some(max.to_vec()),
            });
            attributes.insert("POSITION".to_string(), accessors.len() - 1);

            if self.options.vertex_colors {
                let rgba = primitive.color.to_array();
                let view = buffer.push_f32s(
                    std::iter::repeat(rgba).take(primitive.vertex_count()).flatten(),
                    TARGET_ARRAY_BUFFER,
                )?;
                accessors.push(Accessor {
                    buffer_view: view,
                    byte_offset: 0,
                    component_type: COMPONENT_TYPE_FLOAT,
                    count: primitive.vertex_count(),
                    accessor_type: AccessorType::Vec4,
                    min: None,
                    max: None,
                });
                attributes.insert("COLOR_0".to_string(), accessors.len() - 1);
            }

            let view = buffer.push_u32s(&primitive.indices, TARGET_ELEMENT_ARRAY_BUFFER)?;
            accessors.push(Accessor {
                buffer_view: view,
                byte_offset: 0,
                component_type: COMPONENT_TYPE_UNSIGNED_INT,
                count: primitive.indices.len(),
                accessor_type: AccessorType::Scalar,
                min: None,
                max: None,
            });
            let indices = accessors.len() - 1;

            materials.push(material_for(primitive.color));
            primitives.push(Primitive {
                attributes,
                indices: Some(indices),
                material: Some(materials.len() - 1),
                mode: Some(MODE_TRIANGLES),
            });
        }

        let mut nodes = Vec::new();
        let mut extensions_used = Vec::new();
        let mut extensions = None;
        if self.options.lights {
            let mut lights = Vec::with_capacity(LIGHT_ROTATIONS.len());
            for rotation in LIGHT_ROTATIONS {
                nodes.push(Node {
                    rotation: Some(rotation),
                    extensions: Some(NodeExtensions {
                        lights_punctual: Some(NodeLight { light: lights.len() }),
                    }),
                    ..Node::default()
                });
                lights.push(Light {
                    light_type: LightType::Directional,
                    color: [1.0, 1.0, 1.0],
                    intensity: 1.0,
                });
            }
            extensions_used.push(KHR_LIGHTS_PUNCTUAL.to_string());
            extensions = Some(DocumentExtensions {
                lights_punctual: Some(LightsPunctual { lights }),
            });
        }
        nodes.push(Node {
            mesh: Some(0),
            ..Node::default()
        });

        let document = Document {
            asset: Asset {
                generator: Some(self.options.generator.clone()),
                ..Asset::default()
            },
            scene: Some(0),
            scenes: vec![Scene {
                name: None,
                nodes: (0..nodes.len()).collect(),
            }],
            nodes,
            meshes: vec![Mesh {
                name: None,
                primitives,
            }],
            materials,
            accessors,
            buffer_views: buffer.views,
            buffers: vec![Buffer {
                byte_length: buffer.data.len(),
                uri: None,
            }],
            extensions_used,
            extensions,
        };

        debug!(
            primitives = packed.len(),
            bytes = buffer.data.len(),
            "built glTF scene"
        );

        Ok(GlbContainer {
            document,
            bin: buffer.data,
        })
    }
}

fn material_for(color: Color) -> Material {
    Material {
        name: None,
        pbr_metallic_roughness: PbrMetallicRoughness {
            base_color_factor: color.to_array(),
            metallic_factor: METALLIC_FACTOR,
            roughness_factor: ROUGHNESS_FACTOR,
        },
        alpha_mode: if color.is_translucent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        double_sided: true,
    }
}

/// Export with the default options
pub fn export_glb(polyhedron: &IndexedPolyhedron) -> Result<Vec<u8>> {
    GlbExporter::default().export(polyhedron)
}

pub struct GlbWriter;

impl SceneWriter for GlbWriter {
    fn write_scene<P: AsRef<Path>>(polyhedron: &IndexedPolyhedron, path: P) -> Result<()> {
        GlbExporter::default().write(polyhedron, path)
    }
}
