//! Binary model I/O.
//!
//! - [`native`]: the packed little-endian tree layout (encode and read back)
//! - [`convert`]: text dump file to binary file

pub mod convert;
pub mod native;

pub use convert::{convert_file, ConvertError, ConvertReport};
pub use native::{
    decode, encode, encoded_len, read_from, write_to, DecodeError, EncodedInternal, EncodedModel,
    EncodedTree,
};
