pub mod ip;

pub use ip::{decode_range, encode as encode_ip, is_dotted_quad};
