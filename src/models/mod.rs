/// Packed rows of bits
pub mod bit_array;
/// Packed 2D bit storage
pub mod matrix;
/// Image-space points and their ordering
pub mod point;
/// Final reader result and EC levels
pub mod qr_code;

pub use bit_array::BitArray;
pub use matrix::BitMatrix;
pub use point::{Point, ResultPoint, ResultPointCallback, order_best_patterns};
pub use qr_code::{ECLevel, QRCode, StructuredAppend};
