use chrono::Local;
use itertools::Itertools;
use url::Url;

pub fn log_i(message: &str) {
    log::info!("{}", message);
}

pub fn get_basename_no_extension(path: &str) -> String {
    let segments = path.split("/");
    let file_name = segments.last().unwrap_or_default();
    let dot_segments = file_name.split(".").collect_vec();
    let basename = dot_segments[0..dot_segments.len() - 1].join(".");
    return basename;
}

pub fn get_base_url(url: &Url) -> Url {
    let mut result = url.clone();
    result.set_fragment(None);
    return result.join("./").unwrap();
}

pub const PATH_SEPARATOR: &str = "/";

pub trait ToHexString {
    fn to_hex_string(&self) -> String;
}

impl ToHexString for Vec<u8> {
    fn to_hex_string(&self) -> String {
        self.iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

pub fn get_ticks() -> u32 {
    let time: chrono::DateTime<Local> = Local::now();
    // 60 ticks per second
    let millis = time.timestamp_millis();
    (millis as f32 / (1000.0 / 60.0)) as u32
}

/// Ticks (60/sec) elapsed since `start_time`, for Lingo's `the ticks`.
pub fn get_elapsed_ticks(start_time: chrono::DateTime<Local>) -> i32 {
    let millis = Local::now()
        .signed_duration_since(start_time)
        .num_milliseconds();
    (millis as f32 / (1000.0 / 60.0)) as i32
}
