//! CryEngine geometry and animation header sniffing.

use skope::data::{ArrayNode, BasicNode, StructNode};
use skope::model::NodeRef;
use skope_core::logging::targets;

use super::{FormatError, HeaderReader};

const SIGNATURE: &[u8] = b"CryTek\0\0";

const FILE_TYPE_GEOM: u32 = 0xFFFF_0000;
const FILE_TYPE_ANIM: u32 = 0xFFFF_0001;

/// Far Cry chunk table layout: type, version, offset, id.
const TABLE_V744: u32 = 0x744;
/// Crysis chunk table layout: adds the chunk size.
const TABLE_V745: u32 = 0x745;

const CHUNK_TYPE_BASE: u32 = 0xCCCC_0000;

/// Chunk type names, indexed by `chunk_type - 0xCCCC0000`.
const CHUNK_TYPES: [&str; 25] = [
    "Mesh",
    "Helper",
    "VertAnim",
    "BoneAnim",
    "GeomNameList",
    "BoneNameList",
    "MtlList",
    "MRM",
    "SceneProps",
    "Light",
    "PatchMesh",
    "Node",
    "Mtl",
    "Controller",
    "Timing",
    "BoneMesh",
    "BoneLightBinding",
    "MeshMorphTarget",
    "BoneInitialPos",
    "SourceInfo",
    "MtlName",
    "ExportFlags",
    "DataStream",
    "MeshSubsets",
    "MeshPhysicsData",
];

pub(super) fn matches(data: &[u8]) -> bool {
    data.starts_with(SIGNATURE)
}

fn chunk_type_name(chunk_type: u32) -> Option<&'static str> {
    let slot = chunk_type.checked_sub(CHUNK_TYPE_BASE)?;
    CHUNK_TYPES.get(usize::try_from(slot).ok()?).copied()
}

struct ChunkEntry {
    chunk_type: u32,
    version: u32,
    offset: u32,
    id: u32,
    size: Option<u32>,
}

impl ChunkEntry {
    fn read(reader: &mut HeaderReader<'_>, table_version: u32) -> Result<Self, FormatError> {
        Ok(Self {
            chunk_type: reader.u32_le()?,
            version: reader.u32_le()?,
            offset: reader.u32_le()?,
            id: reader.u32_le()?,
            size: if table_version == TABLE_V745 {
                Some(reader.u32_le()?)
            } else {
                None
            },
        })
    }

    fn into_block(self) -> Result<NodeRef, FormatError> {
        let name = chunk_type_name(self.chunk_type);
        let block = StructNode::new(match name {
            Some(name) => format!("{name}Chunk"),
            None => "UnknownChunk".to_string(),
        });

        let type_text = match name {
            Some(name) => name.to_string(),
            None => format!("{:#010x}", self.chunk_type),
        };
        block.add_field("Chunk Type", BasicNode::new("ChunkType", type_text))?;
        block.add_field("Version", BasicNode::new("uint", format!("{:#06x}", self.version)))?;
        block.add_field("Offset", BasicNode::new("uint", self.offset))?;
        block.add_field("Id", BasicNode::new("uint", self.id))?;
        if let Some(size) = self.size {
            block.add_field("Size", BasicNode::new("uint", size))?;
            block.add_field("Data", BasicNode::opaque("ByteArray", format!("{size} bytes")))?;
        }

        let block: NodeRef = block;
        Ok(block)
    }
}

pub(super) fn read_blocks(data: &[u8]) -> Result<Vec<NodeRef>, FormatError> {
    let mut reader = HeaderReader::new(data);
    let signature = reader.bytes(SIGNATURE.len())?;

    let file_type = match reader.u32_le()? {
        FILE_TYPE_GEOM => "GEOM",
        FILE_TYPE_ANIM => "ANIM",
        other => return Err(FormatError::invalid("file type", format!("{other:#010x}"))),
    };
    let table_version = reader.u32_le()?;
    if table_version != TABLE_V744 && table_version != TABLE_V745 {
        return Err(FormatError::invalid(
            "chunk table version",
            format!("{table_version:#x}, expected 0x744 or 0x745"),
        ));
    }
    let table_offset = reader.u32_le()?;

    let header = StructNode::new("Header");
    let signature_text = String::from_utf8_lossy(signature.split(|&b| b == 0).next().unwrap_or_default());
    header.add_field("Signature", BasicNode::opaque("String", signature_text))?;
    header.add_field("File Type", BasicNode::new("FileType", file_type))?;
    header.add_field("Version", BasicNode::new("FileVersion", format!("{table_version:#06x}")))?;
    header.add_field("Table Offset", BasicNode::new("uint", table_offset))?;

    let table_offset = usize::try_from(table_offset)
        .map_err(|_| FormatError::invalid("table offset", table_offset.to_string()))?;
    reader.seek(table_offset)?;
    let count = reader.u32_le()?;

    let chunks = ArrayNode::with_type_name("Ref[]");
    let mut blocks: Vec<NodeRef> = Vec::new();
    for _ in 0..count {
        let block = ChunkEntry::read(&mut reader, table_version)?.into_block()?;
        chunks.push(BasicNode::reference("Ref", block.clone()))?;
        blocks.push(block);
    }
    header.add_field("Chunks", chunks)?;

    tracing::info!(target: targets::CLI, file_type, chunks = count, "detected CGF header");
    let header: NodeRef = header;
    blocks.insert(0, header);
    Ok(blocks)
}
