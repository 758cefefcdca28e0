// Binary message catalog reading and writing. Kept free of imports so
// the build script can include this file directly.

pub const MO_MAGIC: u32 = 0x950412de;

const HEADER_LEN: usize = 28;

/// Serializes a message table into the binary catalog layout: a 28 byte
/// header, two tables of (length, offset) pairs sorted by original
/// string, then the NUL-terminated string blocks.
///
/// Used by the build script and tests; the running app only reads.
#[cfg_attr(not(test), allow(dead_code))]
pub fn encode_mo(messages: &std::collections::BTreeMap<String, String>) -> Vec<u8> {
    let count = messages.len() as u32;
    let ids_table_start = HEADER_LEN as u32;
    let strs_table_start = ids_table_start + 8 * count;
    let data_start = strs_table_start + 8 * count;

    let mut ids: Vec<u8> = Vec::new();
    let mut strs: Vec<u8> = Vec::new();
    let mut ids_table: Vec<u8> = Vec::new();

    for id in messages.keys() {
        ids_table.extend_from_slice(&(id.len() as u32).to_le_bytes());
        ids_table.extend_from_slice(&(data_start + ids.len() as u32).to_le_bytes());
        ids.extend_from_slice(id.as_bytes());
        ids.push(0);
    }

    // The translated block sits after every original string, so its
    // offsets are relative to the end of the id block.
    let mut strs_table: Vec<u8> = Vec::new();
    for translation in messages.values() {
        strs_table.extend_from_slice(&(translation.len() as u32).to_le_bytes());
        strs_table.extend_from_slice(&(data_start + ids.len() as u32 + strs.len() as u32).to_le_bytes());
        strs.extend_from_slice(translation.as_bytes());
        strs.push(0);
    }

    let mut out = Vec::with_capacity(data_start as usize + ids.len() + strs.len());
    out.extend_from_slice(&MO_MAGIC.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&ids_table_start.to_le_bytes());
    out.extend_from_slice(&strs_table_start.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data_start.to_le_bytes());
    out.extend_from_slice(&ids_table);
    out.extend_from_slice(&strs_table);
    out.extend_from_slice(&ids);
    out.extend_from_slice(&strs);
    out
}

fn u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn string_at(data: &[u8], table: usize, index: usize) -> Option<&str> {
    let entry = table + index * 8;
    let len = u32_at(data, entry)? as usize;
    let start = u32_at(data, entry + 4)? as usize;
    let bytes = data.get(start..start + len)?;
    std::str::from_utf8(bytes).ok()
}

/// Parses a little-endian binary catalog into a lookup table. Malformed
/// input yields None rather than panicking, so a damaged catalog
/// quietly degrades to untranslated text.
pub fn parse_mo(data: &[u8]) -> Option<std::collections::HashMap<String, String>> {
    if u32_at(data, 0)? != MO_MAGIC {
        return None;
    }
    let count = u32_at(data, 8)? as usize;
    let ids_table = u32_at(data, 12)? as usize;
    let strs_table = u32_at(data, 16)? as usize;

    let mut messages = std::collections::HashMap::with_capacity(count);
    for index in 0..count {
        let id = string_at(data, ids_table, index)?;
        let translation = string_at(data, strs_table, index)?;
        messages.insert(id.to_string(), translation.to_string());
    }
    Some(messages)
}
