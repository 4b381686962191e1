/// Threaded through every chunk lookup while a [`super::file::DirectorFile`]
/// is being read. Carries the handful of facts discovered early in the load
/// (whether the file is afterburner-compressed, where the inline load
/// segment starts, which Director version we're reading, and whether the
/// script context uses the 32-bit "LctX" variable-numbering scheme) that
/// later chunk reads need but that don't belong on any single chunk.
pub struct RIFXReaderContext {
    pub after_burned: bool,
    pub ils_body_offset: usize,
    pub dir_version: u16,
    pub lctx_capital_x: bool,
}

impl RIFXReaderContext {
    pub fn new() -> Self {
        RIFXReaderContext {
            after_burned: false,
            ils_body_offset: 0,
            dir_version: 0,
            lctx_capital_x: false,
        }
    }
}

impl Default for RIFXReaderContext {
    fn default() -> Self {
        Self::new()
    }
}
