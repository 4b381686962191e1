pub mod cast;
pub mod chunks;
pub mod enums;
pub mod file;
pub mod guid;
pub mod lingo;
pub mod rifx;
pub mod static_datum;
pub mod utils;
