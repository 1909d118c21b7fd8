//! glTF 2.0 document model and GLB container
//!
//! Only the parts of glTF the scene exporter emits are modeled: buffers,
//! buffer views, accessors, materials, meshes, nodes, scenes and the
//! `KHR_lights_punctual` extension. The same types deserialize, so a GLB
//! written here can be read back with [`GlbContainer::from_slice`].

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use scadview_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

/// `glTF` in little-endian byte order
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;

const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

pub const COMPONENT_TYPE_UNSIGNED_INT: u32 = 5125;
pub const COMPONENT_TYPE_FLOAT: u32 = 5126;

pub const TARGET_ARRAY_BUFFER: u32 = 34962;
pub const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

pub const MODE_TRIANGLES: u32 = 4;

pub const KHR_LIGHTS_PUNCTUAL: &str = "KHR_lights_punctual";

/// glTF root object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub asset: Asset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<DocumentExtensions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            generator: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<usize>,
    /// Unit quaternion `[x, y, z, w]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<NodeExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub attributes: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessorType {
    Scalar,
    Vec3,
    Vec4,
}

impl AccessorType {
    /// Components per element
    pub fn components(self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub accessor_type: AccessorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// A buffer; without a `uri` it refers to the GLB binary chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtensions {
    #[serde(rename = "KHR_lights_punctual", default, skip_serializing_if = "Option::is_none")]
    pub lights_punctual: Option<LightsPunctual>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightsPunctual {
    pub lights: Vec<Light>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    #[serde(rename = "type")]
    pub light_type: LightType,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeExtensions {
    #[serde(rename = "KHR_lights_punctual", default, skip_serializing_if = "Option::is_none")]
    pub lights_punctual: Option<NodeLight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLight {
    pub light: usize,
}

/// A glTF document together with its embedded binary buffer
#[derive(Debug, Clone, PartialEq)]
pub struct GlbContainer {
    pub document: Document,
    pub bin: Vec<u8>,
}

impl GlbContainer {
    /// Serialize to GLB bytes.
    ///
    /// The JSON chunk is padded with spaces and the binary chunk with zeros to
    /// 4-byte boundaries. The binary chunk is omitted when `bin` is empty.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut json = serde_json::to_vec(&self.document)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        json.resize(padded_len(json.len()), b' ');

        let bin_len = padded_len(self.bin.len());
        let mut total = GLB_HEADER_LEN + CHUNK_HEADER_LEN + json.len();
        if bin_len > 0 {
            total += CHUNK_HEADER_LEN + bin_len;
        }
        let total_u32 = u32::try_from(total)
            .map_err(|_| Error::Serialization(format!("GLB of {} bytes exceeds 4 GiB", total)))?;

        let mut out = Vec::with_capacity(total);
        out.write_u32::<LittleEndian>(GLB_MAGIC)?;
        out.write_u32::<LittleEndian>(GLB_VERSION)?;
        out.write_u32::<LittleEndian>(total_u32)?;

        out.write_u32::<LittleEndian>(json.len() as u32)?;
        out.write_u32::<LittleEndian>(CHUNK_TYPE_JSON)?;
        out.extend_from_slice(&json);

        if bin_len > 0 {
            out.write_u32::<LittleEndian>(bin_len as u32)?;
            out.write_u32::<LittleEndian>(CHUNK_TYPE_BIN)?;
            out.extend_from_slice(&self.bin);
            out.resize(total, 0);
        }

        Ok(out)
    }

    /// Parse GLB bytes, checking the header and chunk layout
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let truncated = |_| Error::InvalidGlb("unexpected end of data".to_string());

        let magic = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        if magic != GLB_MAGIC {
            return Err(Error::InvalidGlb(format!("bad magic 0x{:08x}", magic)));
        }
        let version = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        if version != GLB_VERSION {
            return Err(Error::InvalidGlb(format!("unsupported version {}", version)));
        }
        let length = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        if length != bytes.len() {
            return Err(Error::InvalidGlb(format!(
                "header declares {} bytes but {} were given",
                length,
                bytes.len()
            )));
        }

        let json = read_chunk(&mut cursor, CHUNK_TYPE_JSON)?;
        let document: Document = serde_json::from_slice(&json)
            .map_err(|e| Error::InvalidGlb(format!("JSON chunk: {}", e)))?;

        let bin = if (cursor.position() as usize) < bytes.len() {
            read_chunk(&mut cursor, CHUNK_TYPE_BIN)?
        } else {
            Vec::new()
        };

        Ok(Self { document, bin })
    }

    /// Bytes covered by a buffer view
    pub fn view_bytes(&self, view: usize) -> Result<&[u8]> {
        let view = self
            .document
            .buffer_views
            .get(view)
            .ok_or_else(|| Error::InvalidGlb(format!("no buffer view {}", view)))?;
        view.byte_offset
            .checked_add(view.byte_length)
            .and_then(|end| self.bin.get(view.byte_offset..end))
            .ok_or_else(|| Error::InvalidGlb("buffer view exceeds binary chunk".to_string()))
    }

    /// Decode a float accessor into its components
    pub fn read_f32_accessor(&self, accessor: usize) -> Result<Vec<f32>> {
        let (bytes, count) = self.accessor_bytes(accessor, COMPONENT_TYPE_FLOAT)?;
        let mut reader = Cursor::new(bytes);
        (0..count)
            .map(|_| reader.read_f32::<LittleEndian>().map_err(Error::from))
            .collect()
    }

    /// Decode an unsigned int accessor into its components
    pub fn read_u32_accessor(&self, accessor: usize) -> Result<Vec<u32>> {
        let (bytes, count) = self.accessor_bytes(accessor, COMPONENT_TYPE_UNSIGNED_INT)?;
        let mut reader = Cursor::new(bytes);
        (0..count)
            .map(|_| reader.read_u32::<LittleEndian>().map_err(Error::from))
            .collect()
    }

    fn accessor_bytes(&self, accessor: usize, component_type: u32) -> Result<(&[u8], usize)> {
        let accessor = self
            .document
            .accessors
            .get(accessor)
            .ok_or_else(|| Error::InvalidGlb(format!("no accessor {}", accessor)))?;
        if accessor.component_type != component_type {
            return Err(Error::InvalidGlb(format!(
                "accessor has component type {}, expected {}",
                accessor.component_type, component_type
            )));
        }
        let exceeds = || Error::InvalidGlb("accessor exceeds its buffer view".to_string());
        let components = accessor
            .count
            .checked_mul(accessor.accessor_type.components())
            .ok_or_else(exceeds)?;
        let end = components
            .checked_mul(4)
            .and_then(|len| len.checked_add(accessor.byte_offset))
            .ok_or_else(exceeds)?;
        let bytes = self
            .view_bytes(accessor.buffer_view)?
            .get(accessor.byte_offset..end)
            .ok_or_else(exceeds)?;
        Ok((bytes, components))
    }
}

/// Parse GLB bytes into a [`GlbContainer`]
pub fn read_glb(bytes: &[u8]) -> Result<GlbContainer> {
    GlbContainer::from_slice(bytes)
}

fn read_chunk(cursor: &mut Cursor<&[u8]>, expected_type: u32) -> Result<Vec<u8>> {
    let truncated = |_| Error::InvalidGlb("truncated chunk header".to_string());
    let length = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    let chunk_type = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    if chunk_type != expected_type {
        return Err(Error::InvalidGlb(format!(
            "expected chunk type 0x{:08x}, found 0x{:08x}",
            expected_type, chunk_type
        )));
    }

    let remaining = (cursor.get_ref().len() as u64).saturating_sub(cursor.position());
    if length as u64 > remaining {
        return Err(Error::InvalidGlb("chunk exceeds container length".to_string()));
    }

    let mut data = vec![0u8; length];
    cursor.read_exact(&mut data)?;
    Ok(data)
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        Document {
            asset: Asset {
                generator: Some("test".to_string()),
                ..Asset::default()
            },
            scene: Some(0),
            scenes: vec![Scene { name: None, nodes: vec![0] }],
            nodes: vec![Node {
                rotation: Some([0.0, 0.0, 0.0, 1.0]),
                extensions: Some(NodeExtensions {
                    lights_punctual: Some(NodeLight { light: 0 }),
                }),
                ..Node::default()
            }],
            buffers: vec![Buffer { byte_length: 5, uri: None }],
            extensions_used: vec![KHR_LIGHTS_PUNCTUAL.to_string()],
            extensions: Some(DocumentExtensions {
                lights_punctual: Some(LightsPunctual {
                    lights: vec![Light {
                        light_type: LightType::Directional,
                        color: [1.0, 1.0, 1.0],
                        intensity: 1.0,
                    }],
                }),
            }),
            ..Document::default()
        }
    }

    #[test]
    fn test_container_layout() {
        let container = GlbContainer {
            document: sample_document(),
            bin: vec![1, 2, 3, 4, 5],
        };
        let bytes = container.to_bytes().unwrap();

        assert_eq!(&bytes[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize, bytes.len());
        assert_eq!(bytes.len() % 4, 0);

        let json_len = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(&bytes[16..20], b"JSON");

        let bin_header = 20 + json_len;
        assert_eq!(u32::from_le_bytes(bytes[bin_header..bin_header + 4].try_into().unwrap()), 8);
        assert_eq!(&bytes[bin_header + 4..bin_header + 8], b"BIN\0");
        assert_eq!(&bytes[bin_header + 8..], &[1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_json_uses_gltf_names() {
        let json = serde_json::to_value(sample_document()).unwrap();
        assert_eq!(json["asset"]["version"], "2.0");
        assert_eq!(json["extensionsUsed"][0], "KHR_lights_punctual");
        assert_eq!(json["extensions"]["KHR_lights_punctual"]["lights"][0]["type"], "directional");
        assert_eq!(json["nodes"][0]["extensions"]["KHR_lights_punctual"]["light"], 0);
        assert_eq!(json["buffers"][0]["byteLength"], 5);
        assert!(json["buffers"][0].get("uri").is_none());
        assert!(json.get("meshes").is_none());
    }

    #[test]
    fn test_read_back() {
        let container = GlbContainer {
            document: sample_document(),
            bin: vec![9, 8, 7, 6],
        };
        let parsed = read_glb(&container.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, container);
    }

    #[test]
    fn test_json_only_container() {
        let container = GlbContainer {
            document: Document::default(),
            bin: Vec::new(),
        };
        let bytes = container.to_bytes().unwrap();
        let parsed = read_glb(&bytes).unwrap();
        assert!(parsed.bin.is_empty());
    }

    #[test]
    fn test_rejects_malformed_containers() {
        assert!(matches!(read_glb(b"glT"), Err(Error::InvalidGlb(_))));
        assert!(matches!(read_glb(b"xxxx\x02\0\0\0\x0c\0\0\0"), Err(Error::InvalidGlb(_))));

        let mut bytes = GlbContainer {
            document: sample_document(),
            bin: vec![0; 4],
        }
        .to_bytes()
        .unwrap();
        bytes[4] = 1;
        assert!(matches!(read_glb(&bytes), Err(Error::InvalidGlb(_))));

        bytes[4] = 2;
        bytes.pop();
        assert!(matches!(read_glb(&bytes), Err(Error::InvalidGlb(_))));
    }

    #[test]
    fn test_oversized_chunk_length() {
        let mut bytes = GlbContainer {
            document: sample_document(),
            bin: Vec::new(),
        }
        .to_bytes()
        .unwrap();
        bytes[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read_glb(&bytes), Err(Error::InvalidGlb(_))));
    }

    #[test]
    fn test_overflowing_offsets() {
        let mut container = GlbContainer {
            document: sample_document(),
            bin: vec![0; 8],
        };
        container.document.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: usize::MAX,
            byte_length: 4,
            target: None,
        });
        container.document.accessors.push(Accessor {
            buffer_view: 0,
            byte_offset: 0,
            component_type: COMPONENT_TYPE_FLOAT,
            count: 1,
            accessor_type: AccessorType::Scalar,
            min: None,
            max: None,
        });
        container.document.accessors.push(Accessor {
            buffer_view: 1,
            byte_offset: 0,
            component_type: COMPONENT_TYPE_UNSIGNED_INT,
            count: usize::MAX,
            accessor_type: AccessorType::Vec4,
            min: None,
            max: None,
        });
        container.document.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: 0,
            byte_length: 8,
            target: None,
        });

        assert!(matches!(container.view_bytes(0), Err(Error::InvalidGlb(_))));
        assert!(matches!(container.read_f32_accessor(0), Err(Error::InvalidGlb(_))));
        assert!(matches!(container.read_u32_accessor(1), Err(Error::InvalidGlb(_))));
    }
}
