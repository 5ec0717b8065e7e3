pub mod codec;
pub mod format;

pub use codec::{BinaryReader, BinaryWriter, Decode, Encode};
