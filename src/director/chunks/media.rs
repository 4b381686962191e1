use binary_reader::{BinaryReader, Endian};
use log::debug;
use std::convert::TryInto;

/// Typed header for an `ediM` (embedded media) chunk — typically an
/// audio-bearing member. Only the header fields and a compression-kind
/// classification are parsed; decoding is left to the host.
#[derive(Debug, Clone)]
pub struct MediaChunk {
    pub sample_rate: u32,
    pub data_size_field: u32,
    pub guid: Option<[u8; 16]>,
    pub audio_data: Vec<u8>,
    pub is_compressed: bool,
}

impl MediaChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<Self, String> {
        let original_endian = reader.endian;
        reader.endian = Endian::Big;

        let header_size = reader.read_u32().map_err(|e| e.to_string())?;
        let _unknown1 = reader.read_u32().map_err(|e| e.to_string())?;
        let sample_rate = reader.read_u32().map_err(|e| e.to_string())?;
        let _sample_rate2 = reader.read_u32().map_err(|e| e.to_string())?;
        let _unknown2 = reader.read_u32().map_err(|e| e.to_string())?;
        let data_size_field = reader.read_u32().map_err(|e| e.to_string())?;

        let bytes_read = 24;
        let skip_bytes = (header_size as usize).saturating_sub(bytes_read);

        let guid = if skip_bytes >= 16 {
            let b = reader.read_bytes(16).map_err(|e| e.to_string())?;
            Some(b.try_into().unwrap())
        } else {
            None
        };

        if skip_bytes > 16 {
            let _ = reader.read_bytes(skip_bytes - 16);
        } else if skip_bytes > 0 && skip_bytes < 16 {
            let _ = reader.read_bytes(skip_bytes);
        }

        let mut audio_data = Vec::new();
        while let Ok(byte) = reader.read_u8() {
            audio_data.push(byte);
        }

        let is_mp3 =
            audio_data.len() >= 2 && audio_data[0] == 0xFF && (audio_data[1] & 0xE0) == 0xE0;
        let compression_ratio = if !audio_data.is_empty() {
            data_size_field as f32 / audio_data.len() as f32
        } else {
            1.0
        };
        let is_ima_adpcm = compression_ratio > 2.0 && !is_mp3;
        let is_compressed = is_mp3 || is_ima_adpcm;

        debug!(
            "media chunk: {} bytes (expected {}), mp3={} ima_adpcm={} rate={}",
            audio_data.len(),
            data_size_field,
            is_mp3,
            is_ima_adpcm,
            sample_rate
        );

        reader.endian = original_endian;

        Ok(MediaChunk {
            sample_rate,
            data_size_field,
            guid,
            audio_data,
            is_compressed,
        })
    }

    pub fn get_codec_name(&self) -> &str {
        if let Some(guid) = self.guid {
            // 5A08CD40-535B-11D0-... identifies IMA ADPCM under DirectSound.
            if guid[0..8] == [0x5A, 0x08, 0xCD, 0x40, 0x53, 0x5B, 0x11, 0xD0] {
                return "ima_adpcm";
            }
        }

        if self.audio_data.len() >= 2
            && self.audio_data[0] == 0xFF
            && (self.audio_data[1] & 0xE0) == 0xE0
        {
            return "mp3";
        }

        if self.is_compressed {
            "ima_adpcm"
        } else {
            "raw_pcm"
        }
    }

    pub fn is_sound(&self) -> bool {
        self.is_compressed || !self.audio_data.is_empty()
    }
}
