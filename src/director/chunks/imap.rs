use binary_reader::BinaryReader;

/// `imap` chunk: points at the `mmap` chunk that actually lists every
/// chunk in an uncompressed (non-afterburner) file.
pub struct InitialMapChunk {
    pub version: u32,
    pub mmap_offset: usize,
    pub director_version: u32,
}

impl InitialMapChunk {
    pub fn from_reader(reader: &mut BinaryReader, _dir_version: u16) -> Result<InitialMapChunk, String> {
        let version = reader.read_u32().map_err(|e| e.to_string())?;
        let mmap_offset = reader.read_u32().map_err(|e| e.to_string())? as usize;
        let director_version = reader.read_u32().map_err(|e| e.to_string())?;
        // 3 reserved u32 fields follow, unused.

        Ok(InitialMapChunk {
            version,
            mmap_offset,
            director_version,
        })
    }
}

/// A single entry of the `mmap` chunk's flat chunk table.
pub struct MemoryMapEntry {
    pub fourcc: u32,
    pub len: usize,
    pub offset: i32,
    pub flags: i16,
    pub link: i32,
}

/// `mmap` chunk: the uncompressed-file equivalent of the afterburner map —
/// a flat table giving every chunk's FourCC, length, and absolute file
/// offset. The table's row index is the chunk id referenced everywhere
/// else (key table, resolver lookups, ...).
pub struct MemoryMapChunk {
    pub header_len: u16,
    pub entry_len: u16,
    pub chunk_count_max: i32,
    pub chunk_count_used: i32,
    pub entries: Vec<MemoryMapEntry>,
}

impl MemoryMapChunk {
    pub fn from_reader(reader: &mut BinaryReader, _dir_version: u16) -> Result<MemoryMapChunk, String> {
        let header_len = reader.read_u16().map_err(|e| e.to_string())?;
        let entry_len = reader.read_u16().map_err(|e| e.to_string())?;
        let chunk_count_max = reader.read_i32().map_err(|e| e.to_string())?;
        let chunk_count_used = reader.read_i32().map_err(|e| e.to_string())?;
        let _junk_ptr = reader.read_i32().map_err(|e| e.to_string())?;
        let _reserved = reader.read_bytes(4).map_err(|e| e.to_string())?;
        let _free_ptr = reader.read_i32().map_err(|e| e.to_string())?;

        let mut entries = Vec::with_capacity(chunk_count_used.max(0) as usize);
        for _ in 0..chunk_count_max.max(0) {
            let fourcc = reader.read_u32().map_err(|e| e.to_string())?;
            let len = reader.read_i32().map_err(|e| e.to_string())? as usize;
            let offset = reader.read_i32().map_err(|e| e.to_string())?;
            let flags = reader.read_i16().map_err(|e| e.to_string())?;
            let _reserved = reader.read_bytes(2).map_err(|e| e.to_string())?;
            let link = reader.read_i32().map_err(|e| e.to_string())?;

            entries.push(MemoryMapEntry {
                fourcc,
                len,
                offset,
                flags,
                link,
            });
        }

        Ok(MemoryMapChunk {
            header_len,
            entry_len,
            chunk_count_max,
            chunk_count_used,
            entries,
        })
    }
}
