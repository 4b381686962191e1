use binary_reader::{BinaryReader, Endian};

use crate::director::{
    chunks::cast_member_info::CastMemberInfoChunk,
    enums::{BitmapInfo, FilmLoopInfo, MemberType, ScriptType, ShapeInfo},
};

use super::Chunk;

pub struct CastMemberChunk {
    pub member_type: MemberType,
    pub specific_data: CastMemberSpecificData,
    pub specific_data_raw: Vec<u8>,
    pub member_info: Option<CastMemberInfoChunk>,
}

pub struct CastMemberDef {
    pub chunk: CastMemberChunk,
    pub children: Vec<Option<Chunk>>,
}

impl CastMemberChunk {
    #[allow(unused_variables, unused_assignments)]
    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
    ) -> Result<CastMemberChunk, String> {
        reader.endian = Endian::Big;

        let mut info: Option<CastMemberInfoChunk> = None;
        let info_len: usize;
        let specific_data: Vec<u8>;
        let specific_data_len: usize;
        let member_type: MemberType;

        if dir_version >= 500 {
            member_type = MemberType::from(reader.read_u32().unwrap());
            info_len = reader.read_u32().unwrap() as usize;
            specific_data_len = reader.read_u32().unwrap() as usize;

            if info_len != 0 {
                let mut info_reader = BinaryReader::from_u8(reader.read_bytes(info_len).unwrap());
                info_reader.set_endian(reader.endian);
                info = Some(CastMemberInfoChunk::read(&mut info_reader, dir_version).unwrap());
            }

            specific_data = reader.read_bytes(specific_data_len).unwrap().to_vec();
        } else {
            specific_data_len = reader.read_u16().unwrap() as usize;
            info_len = reader.read_u32().unwrap() as usize;

            let mut specific_data_left = specific_data_len;
            member_type = MemberType::from(reader.read_u8().unwrap() as u32);
            specific_data_left -= 1;
            if specific_data_left != 0 {
                reader.read_u8().unwrap(); // flags1
                specific_data_left -= 1;
            }

            specific_data = reader.read_bytes(specific_data_left).unwrap().to_vec();

            if info_len != 0 {
                let mut info_reader = BinaryReader::from_u8(reader.read_bytes(info_len).unwrap());
                info_reader.set_endian(reader.endian);
                info = Some(CastMemberInfoChunk::read(&mut info_reader, dir_version).unwrap());
            }
        }

        let specific_data_parsed = match member_type {
            MemberType::Script => CastMemberSpecificData::Script(ScriptType::from(
                BinaryReader::from_vec(&specific_data)
                    .read_u16()
                    .unwrap(),
            )),
            MemberType::Bitmap => {
                CastMemberSpecificData::Bitmap(BitmapInfo::from(specific_data.as_slice()))
            }
            MemberType::Shape => {
                CastMemberSpecificData::Shape(ShapeInfo::from(specific_data.as_slice()))
            }
            // Film loops share the same on-disk layout as a handful of
            // other member types (video, digital movie) per the "More
            // Director Movie File" community documentation.
            MemberType::FilmLoop => {
                CastMemberSpecificData::FilmLoop(FilmLoopInfo::from(specific_data.as_slice()))
            }
            _ => CastMemberSpecificData::None,
        };

        return Ok(CastMemberChunk {
            member_type,
            specific_data: specific_data_parsed,
            specific_data_raw: specific_data,
            member_info: info,
        });
    }
}

pub enum CastMemberSpecificData {
    Script(ScriptType),
    Bitmap(BitmapInfo),
    Shape(ShapeInfo),
    FilmLoop(FilmLoopInfo),
    None,
}

impl CastMemberSpecificData {
    pub fn script_type(&self) -> Option<ScriptType> {
        if let CastMemberSpecificData::Script(script_type) = self {
            Some(*script_type)
        } else {
            None
        }
    }

    pub fn bitmap_info(&self) -> Option<&BitmapInfo> {
        if let CastMemberSpecificData::Bitmap(bitmap_info) = self {
            Some(bitmap_info)
        } else {
            None
        }
    }

    pub fn shape_info(&self) -> Option<&ShapeInfo> {
        if let CastMemberSpecificData::Shape(shape_info) = self {
            Some(shape_info)
        } else {
            None
        }
    }

    pub fn film_loop_info(&self) -> Option<&FilmLoopInfo> {
        if let CastMemberSpecificData::FilmLoop(film_loop_info) = self {
            Some(film_loop_info)
        } else {
            None
        }
    }
}
