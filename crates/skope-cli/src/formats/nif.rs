//! NetImmerse / Gamebryo header sniffing.

use skope::data::{BasicNode, StructNode};
use skope::model::NodeRef;
use skope_core::logging::targets;

use super::{FormatError, HeaderReader};

const NETIMMERSE: &str = "NetImmerse File Format, Version ";
const GAMEBRYO: &str = "Gamebryo File Format, Version ";

/// Longest header line accepted before giving up on finding `\n`.
const MAX_HEADER_LINE: usize = 128;

const V3_1_0_1: u32 = 0x0301_0001;
const V10_0_1_8: u32 = 0x0A00_0108;
const V20_0_0_3: u32 = 0x1400_0003;

pub(super) fn matches(data: &[u8]) -> bool {
    data.starts_with(NETIMMERSE.as_bytes()) || data.starts_with(GAMEBRYO.as_bytes())
}

/// Packs a dotted version string such as `20.0.0.5` into `0x14000005`.
///
/// Missing trailing parts count as zero. Every part must fit in a byte.
pub(super) fn parse_version(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() > 4 {
        return None;
    }
    let mut version = 0u32;
    for position in 0..4 {
        let digit = match parts.get(position) {
            Some(part) => part.parse::<u8>().ok()?,
            None => 0,
        };
        version = (version << 8) | u32::from(digit);
    }
    Some(version)
}

pub(super) fn format_version(version: u32) -> String {
    let [a, b, c, d] = version.to_be_bytes();
    format!("{a}.{b}.{c}.{d}")
}

fn read_u32(reader: &mut HeaderReader<'_>, little_endian: bool) -> Result<u32, FormatError> {
    if little_endian {
        reader.u32_le()
    } else {
        reader.u32_be()
    }
}

pub(super) fn read_blocks(data: &[u8]) -> Result<Vec<NodeRef>, FormatError> {
    let mut reader = HeaderReader::new(data);
    let line = std::str::from_utf8(reader.line(MAX_HEADER_LINE)?)
        .map_err(|_| FormatError::invalid("header string", "not ASCII text"))?;
    let version_text = line
        .strip_prefix(NETIMMERSE)
        .or_else(|| line.strip_prefix(GAMEBRYO))
        .ok_or_else(|| FormatError::invalid("header string", format!("unexpected '{line}'")))?
        .trim_end();
    let version = parse_version(version_text)
        .ok_or_else(|| FormatError::invalid("header string", format!("bad version '{version_text}'")))?;

    let header = StructNode::new("Header");
    header.add_field("Header String", BasicNode::new("HeaderString", line))?;

    if version >= V3_1_0_1 {
        let binary = reader.u32_le()?;
        if binary != version {
            return Err(FormatError::invalid(
                "version",
                format!(
                    "binary version {} does not match header string version {}",
                    format_version(binary),
                    format_version(version)
                ),
            ));
        }
        header.add_field("Version", BasicNode::new("FileVersion", format_version(binary)))?;
    }

    let mut little_endian = true;
    if version >= V20_0_0_3 {
        little_endian = match reader.u8()? {
            0 => false,
            1 => true,
            other => return Err(FormatError::invalid("endian type", format!("unknown value {other}"))),
        };
        let endian = if little_endian { "ENDIAN_LITTLE" } else { "ENDIAN_BIG" };
        header.add_field("Endian Type", BasicNode::new("EndianType", endian))?;
    }

    if version >= V10_0_1_8 {
        let user_version = read_u32(&mut reader, little_endian)?;
        header.add_field("User Version", BasicNode::new("uint", user_version))?;
    }

    if version >= V3_1_0_1 {
        let num_blocks = read_u32(&mut reader, little_endian)?;
        header.add_field("Num Blocks", BasicNode::new("uint", num_blocks))?;
    }

    tracing::info!(
        target: targets::CLI,
        version = %format_version(version),
        "detected NIF header"
    );
    let header: NodeRef = header;
    Ok(vec![header])
}
