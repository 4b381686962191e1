use binary_reader::BinaryReader;

/// Typed header for a `snd ` cast member chunk. Audio decoding and mixing
/// are out of scope; this keeps only what the resolver needs to expose the
/// member's metadata and hand the raw samples to a host-supplied decoder.
#[derive(Clone, Default)]
pub struct SoundChunk {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub codec: String,
    pub data: Vec<u8>,
}

impl SoundChunk {
    pub fn from_snd_chunk(reader: &mut BinaryReader) -> Result<SoundChunk, String> {
        let mut data = Vec::new();
        while let Ok(byte) = reader.read_u8() {
            data.push(byte);
        }

        Ok(SoundChunk {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            codec: "unknown".to_string(),
            data,
        })
    }

    pub fn from_media(media: &super::media::MediaChunk) -> SoundChunk {
        SoundChunk {
            channels: 1,
            sample_rate: media.sample_rate,
            bits_per_sample: 16,
            codec: media.get_codec_name().to_string(),
            data: media.audio_data.clone(),
        }
    }
}
