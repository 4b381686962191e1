use binary_reader::{BinaryReader, Endian};
use log::debug;

/// `Sord` chunk: a hint table giving the frame-advance order the original
/// authoring tool laid channels out in. Not required to drive the frame
/// loop (sprite/channel order is read from the Score chunk directly), kept
/// only as opaque bytes for round-tripping.
pub struct SordChunk {
    pub raw_data: Vec<u8>,
}

impl SordChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<SordChunk, String> {
        let original_endian = reader.endian;
        reader.endian = Endian::Big;

        let mut raw_data = Vec::new();
        while let Ok(byte) = reader.read_u8() {
            raw_data.push(byte);
        }

        reader.endian = original_endian;
        debug!("read {} bytes for Sord chunk", raw_data.len());

        Ok(SordChunk { raw_data })
    }
}
