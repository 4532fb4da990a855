//! # Shader Binary Loader
//!
//! Parser for the three-level shader binary container:
//!
//! ```text
//!   DVLB  "DVLB" | count | offset[count]          container
//!   DVLP  "DVLP" | code blob | operand descriptors shared code
//!   DVLE  "DVLE" | entry | consts | outputs | uniforms | symbols
//! ```
//!
//! The DVLP chunk directly follows the DVLB offset table; DVLE offsets are
//! relative to the start of the container and table offsets inside a DVLE
//! are relative to the DVLE. Every offset is checked against the enclosing
//! chunk before it is read.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glass_core::{BinaryError, ChunkKind};

use super::{
    ConstUniforms, GeometryMode, MAX_CODE_WORDS, MAX_OPDESCS, MAX_OUTPUT_REGS,
    MAX_UNIFORM_ENTRIES, OutputMap, SharedShaderData, UNUSED_SEMANTICS, UniformData, UniformInfo, UniformKind,
};
use crate::translate;

type ParseResult<T> = core::result::Result<T, BinaryError>;

// =============================================================================
// WIRE FORMAT
// =============================================================================

const DVLB_MAGIC: [u8; 4] = *b"DVLB";
const DVLP_MAGIC: [u8; 4] = *b"DVLP";
const DVLE_MAGIC: [u8; 4] = *b"DVLE";

/// Fixed part of the container header
const DVLB_HEADER_SIZE: usize = 8;

/// Shared code chunk header
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct DvlpHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub code_offset: u32,
    pub code_words: u32,
    pub opdesc_offset: u32,
    pub opdesc_count: u32,
    pub unknown: [u32; 4],
}

/// Shader entry chunk header
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct DvleHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub geometry: u8,
    pub merge_outmaps: u8,
    pub entrypoint: u32,
    pub entrypoint_end: u32,
    pub used_inputs: u16,
    pub used_outputs: u16,
    pub gs_mode: u8,
    pub gs_fixed_start: u8,
    pub gs_variable_num: u8,
    pub gs_fixed_num: u8,
    pub const_offset: u32,
    pub const_count: u32,
    pub label_offset: u32,
    pub label_count: u32,
    pub out_offset: u32,
    pub out_count: u32,
    pub uniform_offset: u32,
    pub uniform_count: u32,
    pub symbol_offset: u32,
    pub symbol_size: u32,
}

/// Constant uniform table entry
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct ConstEntry {
    pub ty: u16,
    pub id: u16,
    pub data: [u32; 4],
}

/// Output register table entry
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct OutEntry {
    pub ty: u16,
    pub reg: u16,
    pub mask: u8,
    pub unknown: [u8; 3],
}

/// Uniform table entry
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct UniformEntry {
    pub symbol: u32,
    pub start: u16,
    pub end: u16,
}

static_assertions::const_assert_eq!(size_of::<DvlpHeader>(), 0x28);
static_assertions::const_assert_eq!(size_of::<DvleHeader>(), 0x40);
static_assertions::const_assert_eq!(size_of::<ConstEntry>(), 20);
static_assertions::const_assert_eq!(size_of::<OutEntry>(), 8);
static_assertions::const_assert_eq!(size_of::<UniformEntry>(), 8);

const CONST_BOOL: u16 = 0;
const CONST_INT: u16 = 1;
const CONST_FLOAT: u16 = 2;

mod result {
    pub const POSITION: u16 = 0;
    pub const NORMALQUAT: u16 = 1;
    pub const COLOR: u16 = 2;
    pub const TEXCOORD0: u16 = 3;
    pub const TEXCOORD0W: u16 = 4;
    pub const TEXCOORD1: u16 = 5;
    pub const TEXCOORD2: u16 = 6;
    pub const VIEW: u16 = 8;
    pub const DUMMY: u16 = 9;
}

// =============================================================================
// PARSED OUTPUT
// =============================================================================

/// Contents of one DVLE
#[derive(Debug, Clone)]
pub struct ShaderEntry {
    /// Geometry stage entry
    pub geometry: bool,
    /// Merge output maps with the vertex shader
    pub merge_outmaps: bool,
    /// Entry point in words
    pub entrypoint: u32,
    /// Primitive mode (geometry entries)
    pub gs_mode: GeometryMode,
    /// Output register layout
    pub outmap: OutputMap,
    /// Constant uniforms
    pub consts: ConstUniforms,
    /// Settable uniforms
    pub uniforms: Vec<UniformInfo>,
}

/// A parsed shader binary
#[derive(Debug, Clone)]
pub struct ShaderBinary {
    /// Code segment shared by every entry
    pub shared: Arc<SharedShaderData>,
    /// Entries in container order
    pub entries: Vec<ShaderEntry>,
}

// =============================================================================
// READERS
// =============================================================================

fn read_pod<T: Pod>(data: &[u8], offset: usize, kind: ChunkKind) -> ParseResult<T> {
    let end = offset
        .checked_add(size_of::<T>())
        .ok_or(BinaryError::OutOfBounds(kind))?;
    data.get(offset..end)
        .map(bytemuck::pod_read_unaligned)
        .ok_or(BinaryError::OutOfBounds(kind))
}

#[inline]
fn read_u32(data: &[u8], offset: usize, kind: ChunkKind) -> ParseResult<u32> {
    read_pod::<u32>(data, offset, kind)
}

/// Entries of a table at `offset` holding `count` records
fn read_table<T: Pod>(
    data: &[u8],
    offset: u32,
    count: u32,
    kind: ChunkKind,
) -> ParseResult<Vec<T>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let start = offset as usize;
    let end = (count as usize)
        .checked_mul(size_of::<T>())
        .and_then(|len| start.checked_add(len))
        .ok_or(BinaryError::OutOfBounds(kind))?;
    if start >= data.len() || end > data.len() {
        return Err(BinaryError::OutOfBounds(kind));
    }
    (0..count as usize)
        .map(|i| read_pod(data, start + i * size_of::<T>(), kind))
        .collect()
}

// =============================================================================
// CHUNK PARSERS
// =============================================================================

/// Parse a complete shader binary
pub fn parse(data: &[u8]) -> ParseResult<ShaderBinary> {
    let offsets = parse_dvlb(data)?;
    let dvlp_start = DVLB_HEADER_SIZE + offsets.len() * 4;
    let shared = parse_dvlp(&data[dvlp_start..])?;

    let entries = offsets
        .iter()
        .map(|&offset| parse_dvle(&data[offset as usize..]))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(ShaderBinary {
        shared: Arc::new(shared),
        entries,
    })
}

fn parse_dvlb(data: &[u8]) -> ParseResult<Vec<u32>> {
    const KIND: ChunkKind = ChunkKind::Dvlb;
    if data.len() <= DVLB_HEADER_SIZE {
        return Err(BinaryError::Truncated(KIND));
    }
    if data[..4] != DVLB_MAGIC {
        return Err(BinaryError::BadMagic(KIND));
    }

    let count = read_u32(data, 0x04, KIND)? as usize;
    let table_end = count
        .checked_mul(4)
        .and_then(|n| n.checked_add(DVLB_HEADER_SIZE))
        .ok_or(BinaryError::OutOfBounds(KIND))?;
    if table_end > data.len() {
        return Err(BinaryError::OutOfBounds(KIND));
    }

    (0..count)
        .map(|i| {
            let offset = read_u32(data, DVLB_HEADER_SIZE + 4 * i, KIND)?;
            if offset as usize > data.len() {
                return Err(BinaryError::OutOfBounds(KIND));
            }
            Ok(offset)
        })
        .collect()
}

fn parse_dvlp(data: &[u8]) -> ParseResult<SharedShaderData> {
    const KIND: ChunkKind = ChunkKind::Dvlp;
    if data.len() <= size_of::<DvlpHeader>() {
        return Err(BinaryError::Truncated(KIND));
    }
    let header: DvlpHeader = read_pod(data, 0, KIND)?;
    if header.magic != DVLP_MAGIC {
        return Err(BinaryError::BadMagic(KIND));
    }
    if header.code_words as usize > MAX_CODE_WORDS || header.opdesc_count as usize > MAX_OPDESCS
    {
        return Err(BinaryError::TooLarge);
    }

    let code = read_table::<u32>(data, header.code_offset, header.code_words, KIND)?;
    // Descriptors are 8 bytes; only the low word is meaningful.
    let opdescs = read_table::<[u32; 2]>(data, header.opdesc_offset, header.opdesc_count, KIND)?
        .into_iter()
        .map(|d| d[0])
        .collect();

    Ok(SharedShaderData { code, opdescs })
}

fn parse_dvle(data: &[u8]) -> ParseResult<ShaderEntry> {
    const KIND: ChunkKind = ChunkKind::Dvle;
    if data.len() <= size_of::<DvleHeader>() {
        return Err(BinaryError::Truncated(KIND));
    }
    let header: DvleHeader = read_pod(data, 0, KIND)?;
    if header.magic != DVLE_MAGIC {
        return Err(BinaryError::BadMagic(KIND));
    }

    let geometry = match header.geometry {
        0 => false,
        1 => true,
        _ => return Err(BinaryError::UnknownValue(KIND)),
    };
    let gs_mode = if geometry {
        match header.gs_mode {
            0 => GeometryMode::Point,
            1 => GeometryMode::VariablePrimitive,
            2 => GeometryMode::FixedPrimitive,
            _ => return Err(BinaryError::UnknownValue(KIND)),
        }
    } else {
        GeometryMode::Point
    };

    let consts = read_table::<ConstEntry>(data, header.const_offset, header.const_count, KIND)?;
    let outs = read_table::<OutEntry>(data, header.out_offset, header.out_count, KIND)?;
    let uniforms =
        read_table::<UniformEntry>(data, header.uniform_offset, header.uniform_count, KIND)?;
    let symbols = read_table::<u8>(data, header.symbol_offset, header.symbol_size, KIND)?;

    Ok(ShaderEntry {
        geometry,
        merge_outmaps: geometry && header.merge_outmaps & 1 != 0,
        entrypoint: header.entrypoint,
        gs_mode,
        outmap: output_map(&outs)?,
        consts: const_uniforms(&consts)?,
        uniforms: uniform_table(&uniforms, &symbols)?,
    })
}

// =============================================================================
// ENTRY CONTENTS
// =============================================================================

/// Assign component semantics to every written output register
fn output_map(outs: &[OutEntry]) -> ParseResult<OutputMap> {
    let mut map = OutputMap::default();

    for out in outs {
        let reg = out.reg as usize;
        if reg >= MAX_OUTPUT_REGS {
            return Err(BinaryError::UnknownValue(ChunkKind::Dvle));
        }
        if map.mask & (1 << reg) == 0 {
            map.mask |= 1 << reg;
            map.total += 1;
        }

        let (base, max) = match out.ty {
            result::POSITION => (0x00, 4),
            result::NORMALQUAT => {
                map.clock |= 1 << 24;
                (0x04, 4)
            }
            result::COLOR => {
                map.clock |= 1 << 1;
                (0x08, 4)
            }
            result::TEXCOORD0 => {
                map.clock |= 1 << 8;
                map.texcoords = true;
                (0x0C, 2)
            }
            result::TEXCOORD0W => {
                map.clock |= 1 << 16;
                map.texcoords = true;
                (0x10, 1)
            }
            result::TEXCOORD1 => {
                map.clock |= 1 << 9;
                map.texcoords = true;
                (0x0E, 2)
            }
            result::TEXCOORD2 => {
                map.clock |= 1 << 10;
                map.texcoords = true;
                (0x16, 2)
            }
            result::VIEW => {
                map.clock |= 1 << 24;
                (0x12, 3)
            }
            result::DUMMY => continue,
            _ => return Err(BinaryError::UnknownValue(ChunkKind::Dvle)),
        };

        let mut sem: u32 = base;
        let mut assigned = 0;
        for component in 0..4 {
            if assigned >= max {
                break;
            }
            if out.mask & (1 << component) == 0 {
                continue;
            }
            let shift = component * 8;
            map.sems[reg] = (map.sems[reg] & !(0xFF << shift)) | (sem << shift);
            sem += 1;
            assigned += 1;
            // position.z drives the depth clock
            if out.ty == result::POSITION && assigned == 3 {
                map.clock |= 1;
            }
        }
    }

    Ok(map)
}

fn const_uniforms(entries: &[ConstEntry]) -> ParseResult<ConstUniforms> {
    let mut consts = ConstUniforms::default();

    for entry in entries {
        let id = entry.id as usize;
        match entry.ty {
            CONST_BOOL => {
                if id >= UniformKind::Bool.limit() {
                    return Err(BinaryError::BadUniformRange);
                }
                if entry.data[0] != 0 {
                    consts.bool_mask |= 1 << id;
                }
            }
            CONST_INT => {
                if id >= UniformKind::Int.limit() {
                    return Err(BinaryError::BadUniformRange);
                }
                consts.int_data[id] = entry.data[0];
                consts.int_mask |= 1 << id;
            }
            CONST_FLOAT => {
                if id >= UniformKind::Float.limit() {
                    return Err(BinaryError::BadUniformRange);
                }
                let value = entry.data.map(translate::f24_to_f32);
                consts
                    .floats
                    .push((id as u8, translate::pack_float_vector(value)));
            }
            _ => return Err(BinaryError::UnknownValue(ChunkKind::Dvle)),
        }
    }

    Ok(consts)
}

/// Register range of each uniform kind, in the unified register space
const fn uniform_range(kind: UniformKind) -> (u16, u16) {
    match kind {
        UniformKind::Float => (0x10, 0x6F),
        UniformKind::Int => (0x70, 0x73),
        UniformKind::Bool => (0x78, 0x87),
    }
}

fn uniform_kind(start: u16) -> Option<UniformKind> {
    [UniformKind::Float, UniformKind::Int, UniformKind::Bool]
        .into_iter()
        .find(|&kind| {
            let (lo, hi) = uniform_range(kind);
            (lo..=hi).contains(&start)
        })
}

fn symbol_name(symbols: &[u8], offset: u32) -> ParseResult<String> {
    let tail = symbols
        .get(offset as usize..)
        .ok_or(BinaryError::OutOfBounds(ChunkKind::Dvle))?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(BinaryError::OutOfBounds(ChunkKind::Dvle))?;
    Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
}

fn uniform_table(entries: &[UniformEntry], symbols: &[u8]) -> ParseResult<Vec<UniformInfo>> {
    if entries.len() > MAX_UNIFORM_ENTRIES {
        return Err(BinaryError::TooManyUniforms);
    }
    entries
        .iter()
        .map(|entry| {
            let kind = uniform_kind(entry.start).ok_or(BinaryError::BadUniformRange)?;
            let (lo, hi) = uniform_range(kind);
            if entry.end < entry.start || entry.end > hi {
                return Err(BinaryError::BadUniformRange);
            }
            let count = (entry.end - entry.start + 1) as usize;
            Ok(UniformInfo {
                id: (entry.start - lo) as u8,
                count: count as u8,
                name: symbol_name(symbols, entry.symbol)?,
                dirty: true,
                data: UniformData::zeroed(kind, count),
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec;

    /// Output register declaration: type, register, component mask
    pub type Out = (u16, u16, u8);

    /// One DVLE to emit
    #[derive(Debug, Clone, Default)]
    pub struct EntryDesc {
        pub geometry: bool,
        pub merge: bool,
        pub entrypoint: u32,
        pub outs: Vec<Out>,
        pub consts: Vec<(u16, u16, [u32; 4])>,
        pub uniforms: Vec<(&'static str, u16, u16)>,
    }

    fn push_pod<T: Pod>(buf: &mut Vec<u8>, value: &T) {
        buf.extend_from_slice(bytemuck::bytes_of(value));
    }

    fn build_dvle(desc: &EntryDesc) -> Vec<u8> {
        let mut symbols = Vec::new();
        let mut uniforms = Vec::new();
        for &(name, start, end) in &desc.uniforms {
            uniforms.push(UniformEntry {
                symbol: symbols.len() as u32,
                start,
                end,
            });
            symbols.extend_from_slice(name.as_bytes());
            symbols.push(0);
        }

        let const_offset = size_of::<DvleHeader>();
        let out_offset = const_offset + desc.consts.len() * size_of::<ConstEntry>();
        let uniform_offset = out_offset + desc.outs.len() * size_of::<OutEntry>();
        let symbol_offset = uniform_offset + uniforms.len() * size_of::<UniformEntry>();

        let header = DvleHeader {
            magic: DVLE_MAGIC,
            geometry: desc.geometry as u8,
            merge_outmaps: desc.merge as u8,
            entrypoint: desc.entrypoint,
            const_offset: const_offset as u32,
            const_count: desc.consts.len() as u32,
            out_offset: out_offset as u32,
            out_count: desc.outs.len() as u32,
            uniform_offset: uniform_offset as u32,
            uniform_count: uniforms.len() as u32,
            symbol_offset: symbol_offset as u32,
            symbol_size: symbols.len() as u32,
            ..Zeroable::zeroed()
        };

        let mut buf = Vec::new();
        push_pod(&mut buf, &header);
        for &(ty, id, data) in &desc.consts {
            push_pod(&mut buf, &ConstEntry { ty, id, data });
        }
        for &(ty, reg, mask) in &desc.outs {
            push_pod(
                &mut buf,
                &OutEntry {
                    ty,
                    reg,
                    mask,
                    unknown: [0; 3],
                },
            );
        }
        for entry in &uniforms {
            push_pod(&mut buf, entry);
        }
        buf.extend_from_slice(&symbols);
        // keep the chunk strictly larger than its header
        buf.extend_from_slice(&[0; 4]);
        buf
    }

    /// Build a container with the given code and entries
    pub fn build_binary(code: &[u32], opdescs: &[u32], entries: &[EntryDesc]) -> Vec<u8> {
        let dvlp_start = DVLB_HEADER_SIZE + entries.len() * 4;
        let code_offset = size_of::<DvlpHeader>();
        let opdesc_offset = code_offset + code.len() * 4;

        let mut dvlp = Vec::new();
        push_pod(
            &mut dvlp,
            &DvlpHeader {
                magic: DVLP_MAGIC,
                code_offset: code_offset as u32,
                code_words: code.len() as u32,
                opdesc_offset: opdesc_offset as u32,
                opdesc_count: opdescs.len() as u32,
                ..Zeroable::zeroed()
            },
        );
        for word in code {
            push_pod(&mut dvlp, word);
        }
        for desc in opdescs {
            push_pod(&mut dvlp, &[*desc, 0u32]);
        }
        dvlp.extend_from_slice(&[0; 4]);

        let dvles: Vec<Vec<u8>> = entries.iter().map(build_dvle).collect();

        let mut buf = Vec::new();
        buf.extend_from_slice(&DVLB_MAGIC);
        push_pod(&mut buf, &(entries.len() as u32));
        let mut offset = dvlp_start + dvlp.len();
        for dvle in &dvles {
            push_pod(&mut buf, &(offset as u32));
            offset += dvle.len();
        }
        buf.extend_from_slice(&dvlp);
        for dvle in &dvles {
            buf.extend_from_slice(dvle);
        }
        buf
    }

    /// Vertex entry writing position to o0 and color to o1
    pub fn vertex_entry() -> EntryDesc {
        EntryDesc {
            entrypoint: 2,
            outs: vec![
                (result::POSITION, 0, 0xF),
                (result::COLOR, 1, 0xF),
            ],
            consts: vec![
                (CONST_BOOL, 15, [1, 0, 0, 0]),
                (CONST_INT, 0, [0x0001_0203, 0, 0, 0]),
                (CONST_FLOAT, 95, [0x3F_0000, 0, 0, 0x3F_0000]),
            ],
            uniforms: vec![("projection", 0x10, 0x13), ("tint", 0x14, 0x14), ("flags", 0x78, 0x79)],
            ..EntryDesc::default()
        }
    }

    #[test]
    fn test_parse_vertex_entry() {
        let blob = build_binary(&[0xAAAA_0000, 0xBBBB_0000, 0x8800_0000], &[0x1234], &[
            vertex_entry(),
        ]);
        let binary = parse(&blob).unwrap();
        assert_eq!(binary.shared.code, vec![0xAAAA_0000, 0xBBBB_0000, 0x8800_0000]);
        assert_eq!(binary.shared.opdescs, vec![0x1234]);

        let entry = &binary.entries[0];
        assert!(!entry.geometry);
        assert_eq!(entry.entrypoint, 2);

        assert_eq!(entry.outmap.mask, 0b11);
        assert_eq!(entry.outmap.total, 2);
        assert_eq!(entry.outmap.sems[0], 0x0302_0100);
        assert_eq!(entry.outmap.sems[1], 0x0B0A_0908);
        assert_eq!(entry.outmap.sems[2], UNUSED_SEMANTICS);
        assert_eq!(entry.outmap.clock, (1 << 1) | 1);
        assert!(!entry.outmap.texcoords);

        assert_eq!(entry.consts.bool_mask, 1 << 15);
        assert_eq!(entry.consts.int_mask, 1);
        assert_eq!(entry.consts.int_data[0], 0x0001_0203);
        assert_eq!(entry.consts.floats.len(), 1);
        assert_eq!(entry.consts.floats[0].0, 95);
        assert_eq!(
            translate::unpack_float_vector(entry.consts.floats[0].1),
            [1.0, 0.0, 0.0, 1.0]
        );

        let names: Vec<&str> = entry.uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["projection", "tint", "flags"]);
        assert_eq!(entry.uniforms[0].kind(), UniformKind::Float);
        assert_eq!((entry.uniforms[0].id, entry.uniforms[0].count), (0, 4));
        assert_eq!((entry.uniforms[1].id, entry.uniforms[1].count), (4, 1));
        assert_eq!(entry.uniforms[2].kind(), UniformKind::Bool);
        assert_eq!((entry.uniforms[2].id, entry.uniforms[2].count), (0, 2));
    }

    #[test]
    fn test_texcoord_semantics() {
        let outs = [
            (result::TEXCOORD0, 2, 0b0011),
            (result::TEXCOORD0W, 2, 0b0100),
            (result::VIEW, 3, 0b0111),
        ];
        let map = output_map(&outs.map(|(ty, reg, mask)| OutEntry {
            ty,
            reg,
            mask,
            unknown: [0; 3],
        }))
        .unwrap();
        assert_eq!(map.total, 2);
        assert_eq!(map.sems[2], 0x1F10_0D0C);
        assert_eq!(map.sems[3], 0x1F14_1312);
        assert_eq!(map.clock, (1 << 8) | (1 << 16) | (1 << 24));
        assert!(map.texcoords);
    }

    #[test]
    fn test_geometry_entry_flags() {
        let gs = EntryDesc {
            geometry: true,
            merge: true,
            outs: vec![(result::POSITION, 0, 0xF)],
            ..EntryDesc::default()
        };
        let binary = parse(&build_binary(&[0], &[], &[vertex_entry(), gs])).unwrap();
        assert_eq!(binary.entries.len(), 2);
        assert!(binary.entries[1].geometry);
        assert!(binary.entries[1].merge_outmaps);
        assert_eq!(binary.entries[1].gs_mode, GeometryMode::Point);
    }

    #[test]
    fn test_reject_bad_magic() {
        let mut blob = build_binary(&[0], &[], &[vertex_entry()]);
        blob[0] = b'X';
        assert_eq!(parse(&blob).unwrap_err(), BinaryError::BadMagic(ChunkKind::Dvlb));

        let mut blob = build_binary(&[0], &[], &[vertex_entry()]);
        blob[12] = b'X';
        assert_eq!(parse(&blob).unwrap_err(), BinaryError::BadMagic(ChunkKind::Dvlp));
    }

    #[test]
    fn test_reject_truncated() {
        assert_eq!(parse(b"DVLB").unwrap_err(), BinaryError::Truncated(ChunkKind::Dvlb));

        let blob = build_binary(&[0, 1, 2, 3], &[], &[vertex_entry()]);
        let cut = &blob[..blob.len() - 20];
        assert!(parse(cut).is_err());
    }

    #[test]
    fn test_reject_entry_table_overflow() {
        let mut blob = build_binary(&[0], &[], &[vertex_entry()]);
        blob[4..8].copy_from_slice(&0x4000_0000u32.to_le_bytes());
        assert_eq!(parse(&blob).unwrap_err(), BinaryError::OutOfBounds(ChunkKind::Dvlb));
    }

    #[test]
    fn test_reject_oversized_code() {
        let code = vec![0; MAX_CODE_WORDS + 1];
        let blob = build_binary(&code, &[], &[vertex_entry()]);
        assert_eq!(parse(&blob).unwrap_err(), BinaryError::TooLarge);
    }

    #[test]
    fn test_reject_bad_uniform_range() {
        let mut desc = vertex_entry();
        desc.uniforms = vec![("spill", 0x72, 0x75)];
        let blob = build_binary(&[0], &[], &[desc]);
        assert_eq!(parse(&blob).unwrap_err(), BinaryError::BadUniformRange);
    }

    #[test]
    fn test_reject_uniform_table_above_location_limit() {
        let mut desc = vertex_entry();
        desc.uniforms = vec![("u", 0x10, 0x10); MAX_UNIFORM_ENTRIES + 1];
        let blob = build_binary(&[0], &[], &[desc]);
        assert_eq!(parse(&blob).unwrap_err(), BinaryError::TooManyUniforms);

        let mut desc = vertex_entry();
        desc.uniforms = vec![("u", 0x10, 0x10); MAX_UNIFORM_ENTRIES];
        let binary = parse(&build_binary(&[0], &[], &[desc])).unwrap();
        assert_eq!(binary.entries[0].uniforms.len(), MAX_UNIFORM_ENTRIES);
    }

    #[test]
    fn test_table_end_overflow() {
        let data = [0u8; 16];
        assert_eq!(
            read_table::<u32>(&data, 8, u32::MAX, ChunkKind::Dvlp).unwrap_err(),
            BinaryError::OutOfBounds(ChunkKind::Dvlp)
        );
        assert_eq!(read_table::<u32>(&data, 8, 2, ChunkKind::Dvlp).unwrap(), [0, 0]);
    }

    #[test]
    fn test_reject_unknown_output() {
        let mut desc = vertex_entry();
        desc.outs.push((7, 2, 0xF));
        let blob = build_binary(&[0], &[], &[desc]);
        assert_eq!(
            parse(&blob).unwrap_err(),
            BinaryError::UnknownValue(ChunkKind::Dvle)
        );
    }
}
