pub mod cast;
pub mod cast_list;
pub mod cast_member;
pub mod cast_member_info;
pub mod config;
pub mod handler;
pub mod imap;
pub mod key_table;
pub mod lctx;
pub mod list;
pub mod literal;
pub mod media;
pub mod palette;
pub mod score;
pub mod score_order;
pub mod script;
pub mod script_names;
pub mod sound;
pub mod text;

use std::collections::HashMap;

use binary_reader::{BinaryReader, Endian};
use config::ConfigChunk;
use imap::{InitialMapChunk, MemoryMapChunk};
use key_table::KeyTableChunk;
use score::FrameLabelsChunk;

use self::media::MediaChunk;
use self::score_order::SordChunk;
use self::sound::SoundChunk;
use self::{
    cast::CastChunk, cast_list::CastListChunk, cast_member::CastMemberChunk,
    lctx::ScriptContextChunk, palette::PaletteChunk, score::ScoreChunk, script::ScriptChunk,
    script_names::ScriptNamesChunk, text::TextChunk,
};
use super::{
    guid::MoaID,
    rifx::RIFXReaderContext,
    utils::{fourcc_to_string, FOURCC},
};

#[allow(dead_code)]
pub enum Chunk {
    Cast(CastChunk),
    CastList(CastListChunk),
    CastMember(CastMemberChunk),
    Config(ConfigChunk),
    InitialMap(InitialMapChunk),
    KeyTable(KeyTableChunk),
    MemoryMap(MemoryMapChunk),
    Script(ScriptChunk),
    ScriptContext(ScriptContextChunk),
    ScriptNames(ScriptNamesChunk),
    FrameLabels(FrameLabelsChunk),
    Score(ScoreChunk),
    ScoreOrder(SordChunk),
    Text(TextChunk),
    Palette(PaletteChunk),
    Sound(SoundChunk),
    Media(MediaChunk),
}

impl Chunk {
    pub fn as_text(&self) -> Option<&TextChunk> {
        match self {
            Self::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_palette(&self) -> Option<&PaletteChunk> {
        match self {
            Self::Palette(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_score(&self) -> Option<&ScoreChunk> {
        match self {
            Self::Score(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_sound(&self) -> Option<&SoundChunk> {
        match self {
            Self::Sound(data) => Some(data),
            _ => None,
        }
    }
}

pub struct ChunkInfo {
    pub id: u32,
    pub fourcc: u32,
    pub len: usize,
    pub uncompressed_len: usize,
    pub offset: usize,
    pub compression_id: MoaID,
}

pub struct ChunkContainer {
    pub deserialized_chunks: HashMap<u32, Chunk>,
    pub chunk_info: HashMap<u32, ChunkInfo>,
    pub cached_chunk_views: HashMap<u32, Vec<u8>>,
}

#[allow(dead_code)]
pub fn is_chunk_writable(chunk_type: Chunk) -> bool {
    match chunk_type {
        Chunk::InitialMap(_) => true,
        Chunk::MemoryMap(_) => true,
        _ => false,
    }
}

pub fn make_chunk(
    endian: Endian,
    rifx: &mut RIFXReaderContext,
    fourcc: u32,
    view: &Vec<u8>,
) -> Result<Chunk, String> {
    let version = rifx.dir_version;
    let mut chunk_reader = BinaryReader::from_vec(view);
    chunk_reader.set_endian(endian);

    match fourcc_to_string(fourcc).as_str() {
        "imap" => Ok(Chunk::InitialMap(InitialMapChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "mmap" => Ok(Chunk::MemoryMap(MemoryMapChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "CAS*" => Ok(Chunk::Cast(CastChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "CASt" => Ok(Chunk::CastMember(CastMemberChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "KEY*" => Ok(Chunk::KeyTable(KeyTableChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "LctX" | "Lctx" => {
            rifx.lctx_capital_x = fourcc == FOURCC("LctX");
            Ok(Chunk::ScriptContext(ScriptContextChunk::from_reader(
                &mut chunk_reader,
                version,
            )?))
        }
        "Lnam" => Ok(Chunk::ScriptNames(ScriptNamesChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "Lscr" => Ok(Chunk::Script(ScriptChunk::from_reader(
            &mut chunk_reader,
            version,
            rifx.lctx_capital_x,
        )?)),
        "DRCF" | "VWCF" => Ok(Chunk::Config(ConfigChunk::from_reader(
            &mut chunk_reader,
            version,
            endian,
        )?)),
        "MCsL" => Ok(Chunk::CastList(CastListChunk::from_reader(
            &mut chunk_reader,
            version,
            endian,
        )?)),
        "VWSC" | "SCVW" => Ok(Chunk::Score(ScoreChunk::read(&mut chunk_reader, version)?)),
        "VWLB" => Ok(Chunk::FrameLabels(FrameLabelsChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "ediM" => Ok(Chunk::Media(MediaChunk::from_reader(&mut chunk_reader)?)),
        "Sord" => Ok(Chunk::ScoreOrder(SordChunk::from_reader(&mut chunk_reader)?)),
        "snd " => Ok(Chunk::Sound(SoundChunk::from_snd_chunk(&mut chunk_reader)?)),
        "STXT" => Ok(Chunk::Text(TextChunk::read(&mut chunk_reader)?)),
        "CLUT" => Ok(Chunk::Palette(PaletteChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        other => Err(format!("Could not deserialize '{}' chunk", other)),
    }
}
