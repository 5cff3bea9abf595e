/// Version tables from ISO/IEC 18004: alignment centres and block layout per EC level.
use super::version::{ECB, ECBlocks, Version};

const fn b(count: u8, data_codewords: u8) -> ECB {
    ECB {
        count,
        data_codewords,
    }
}

const fn ec(ec_codewords_per_block: u8, blocks: &'static [ECB]) -> ECBlocks {
    ECBlocks {
        ec_codewords_per_block,
        blocks,
    }
}

/// Encoded version information for versions 7-40: 6 version bits + 12 BCH bits
pub(crate) const VERSION_DECODE_INFO: [u32; 34] = [
    0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6, 0x0C762, 0x0D847, 0x0E60D, 0x0F928, 0x10B78,
    0x1145D, 0x12A17, 0x13532, 0x149A6, 0x15683, 0x168C9, 0x177EC, 0x18EC4, 0x191E1, 0x1AFAB,
    0x1B08E, 0x1CC1A, 0x1D33F, 0x1ED75, 0x1F250, 0x209D5, 0x216F0, 0x228BA, 0x2379F, 0x24B0B,
    0x2542E, 0x26A64, 0x27541, 0x28C69,
];

/// Versions 1-40; index is `version_number - 1`. Block layouts are in L, M, Q, H order.
pub(crate) static VERSIONS: [Version; 40] = [
    Version::build(
        1,
        &[],
        [
            ec(7, &[b(1, 19)]),
            ec(10, &[b(1, 16)]),
            ec(13, &[b(1, 13)]),
            ec(17, &[b(1, 9)]),
        ],
    ),
    Version::build(
        2,
        &[6, 18],
        [
            ec(10, &[b(1, 34)]),
            ec(16, &[b(1, 28)]),
            ec(22, &[b(1, 22)]),
            ec(28, &[b(1, 16)]),
        ],
    ),
    Version::build(
        3,
        &[6, 22],
        [
            ec(15, &[b(1, 55)]),
            ec(26, &[b(1, 44)]),
            ec(18, &[b(2, 17)]),
            ec(22, &[b(2, 13)]),
        ],
    ),
    Version::build(
        4,
        &[6, 26],
        [
            ec(20, &[b(1, 80)]),
            ec(18, &[b(2, 32)]),
            ec(26, &[b(2, 24)]),
            ec(16, &[b(4, 9)]),
        ],
    ),
    Version::build(
        5,
        &[6, 30],
        [
            ec(26, &[b(1, 108)]),
            ec(24, &[b(2, 43)]),
            ec(18, &[b(2, 15), b(2, 16)]),
            ec(22, &[b(2, 11), b(2, 12)]),
        ],
    ),
    Version::build(
        6,
        &[6, 34],
        [
            ec(18, &[b(2, 68)]),
            ec(16, &[b(4, 27)]),
            ec(24, &[b(4, 19)]),
            ec(28, &[b(4, 15)]),
        ],
    ),
    Version::build(
        7,
        &[6, 22, 38],
        [
            ec(20, &[b(2, 78)]),
            ec(18, &[b(4, 31)]),
            ec(18, &[b(2, 14), b(4, 15)]),
            ec(26, &[b(4, 13), b(1, 14)]),
        ],
    ),
    Version::build(
        8,
        &[6, 24, 42],
        [
            ec(24, &[b(2, 97)]),
            ec(22, &[b(2, 38), b(2, 39)]),
            ec(22, &[b(4, 18), b(2, 19)]),
            ec(26, &[b(4, 14), b(2, 15)]),
        ],
    ),
    Version::build(
        9,
        &[6, 26, 46],
        [
            ec(30, &[b(2, 116)]),
            ec(22, &[b(3, 36), b(2, 37)]),
            ec(20, &[b(4, 16), b(4, 17)]),
            ec(24, &[b(4, 12), b(4, 13)]),
        ],
    ),
    Version::build(
        10,
        &[6, 28, 50],
        [
            ec(18, &[b(2, 68), b(2, 69)]),
            ec(26, &[b(4, 43), b(1, 44)]),
            ec(24, &[b(6, 19), b(2, 20)]),
            ec(28, &[b(6, 15), b(2, 16)]),
        ],
    ),
    Version::build(
        11,
        &[6, 30, 54],
        [
            ec(20, &[b(4, 81)]),
            ec(30, &[b(1, 50), b(4, 51)]),
            ec(28, &[b(4, 22), b(4, 23)]),
            ec(24, &[b(3, 12), b(8, 13)]),
        ],
    ),
    Version::build(
        12,
        &[6, 32, 58],
        [
            ec(24, &[b(2, 92), b(2, 93)]),
            ec(22, &[b(6, 36), b(2, 37)]),
            ec(26, &[b(4, 20), b(6, 21)]),
            ec(28, &[b(7, 14), b(4, 15)]),
        ],
    ),
    Version::build(
        13,
        &[6, 34, 62],
        [
            ec(26, &[b(4, 107)]),
            ec(22, &[b(8, 37), b(1, 38)]),
            ec(24, &[b(8, 20), b(4, 21)]),
            ec(22, &[b(12, 11), b(4, 12)]),
        ],
    ),
    Version::build(
        14,
        &[6, 26, 46, 66],
        [
            ec(30, &[b(3, 115), b(1, 116)]),
            ec(24, &[b(4, 40), b(5, 41)]),
            ec(20, &[b(11, 16), b(5, 17)]),
            ec(24, &[b(11, 12), b(5, 13)]),
        ],
    ),
    Version::build(
        15,
        &[6, 26, 48, 70],
        [
            ec(22, &[b(5, 87), b(1, 88)]),
            ec(24, &[b(5, 41), b(5, 42)]),
            ec(30, &[b(5, 24), b(7, 25)]),
            ec(24, &[b(11, 12), b(7, 13)]),
        ],
    ),
    Version::build(
        16,
        &[6, 26, 50, 74],
        [
            ec(24, &[b(5, 98), b(1, 99)]),
            ec(28, &[b(7, 45), b(3, 46)]),
            ec(24, &[b(15, 19), b(2, 20)]),
            ec(30, &[b(3, 15), b(13, 16)]),
        ],
    ),
    Version::build(
        17,
        &[6, 30, 54, 78],
        [
            ec(28, &[b(1, 107), b(5, 108)]),
            ec(28, &[b(10, 46), b(1, 47)]),
            ec(28, &[b(1, 22), b(15, 23)]),
            ec(28, &[b(2, 14), b(17, 15)]),
        ],
    ),
    Version::build(
        18,
        &[6, 30, 56, 82],
        [
            ec(30, &[b(5, 120), b(1, 121)]),
            ec(26, &[b(9, 43), b(4, 44)]),
            ec(28, &[b(17, 22), b(1, 23)]),
            ec(28, &[b(2, 14), b(19, 15)]),
        ],
    ),
    Version::build(
        19,
        &[6, 30, 58, 86],
        [
            ec(28, &[b(3, 113), b(4, 114)]),
            ec(26, &[b(3, 44), b(11, 45)]),
            ec(26, &[b(17, 21), b(4, 22)]),
            ec(26, &[b(9, 13), b(16, 14)]),
        ],
    ),
    Version::build(
        20,
        &[6, 34, 62, 90],
        [
            ec(28, &[b(3, 107), b(5, 108)]),
            ec(26, &[b(3, 41), b(13, 42)]),
            ec(30, &[b(15, 24), b(5, 25)]),
            ec(28, &[b(15, 15), b(10, 16)]),
        ],
    ),
    Version::build(
        21,
        &[6, 28, 50, 72, 94],
        [
            ec(28, &[b(4, 116), b(4, 117)]),
            ec(26, &[b(17, 42)]),
            ec(28, &[b(17, 22), b(6, 23)]),
            ec(30, &[b(19, 16), b(6, 17)]),
        ],
    ),
    Version::build(
        22,
        &[6, 26, 50, 74, 98],
        [
            ec(28, &[b(2, 111), b(7, 112)]),
            ec(28, &[b(17, 46)]),
            ec(30, &[b(7, 24), b(16, 25)]),
            ec(24, &[b(34, 13)]),
        ],
    ),
    Version::build(
        23,
        &[6, 30, 54, 78, 102],
        [
            ec(30, &[b(4, 121), b(5, 122)]),
            ec(28, &[b(4, 47), b(14, 48)]),
            ec(30, &[b(11, 24), b(14, 25)]),
            ec(30, &[b(16, 15), b(14, 16)]),
        ],
    ),
    Version::build(
        24,
        &[6, 28, 54, 80, 106],
        [
            ec(30, &[b(6, 117), b(4, 118)]),
            ec(28, &[b(6, 45), b(14, 46)]),
            ec(30, &[b(11, 24), b(16, 25)]),
            ec(30, &[b(30, 16), b(2, 17)]),
        ],
    ),
    Version::build(
        25,
        &[6, 32, 58, 84, 110],
        [
            ec(26, &[b(8, 106), b(4, 107)]),
            ec(28, &[b(8, 47), b(13, 48)]),
            ec(30, &[b(7, 24), b(22, 25)]),
            ec(30, &[b(22, 15), b(13, 16)]),
        ],
    ),
    Version::build(
        26,
        &[6, 30, 58, 86, 114],
        [
            ec(28, &[b(10, 114), b(2, 115)]),
            ec(28, &[b(19, 46), b(4, 47)]),
            ec(28, &[b(28, 22), b(6, 23)]),
            ec(30, &[b(33, 16), b(4, 17)]),
        ],
    ),
    Version::build(
        27,
        &[6, 34, 62, 90, 118],
        [
            ec(30, &[b(8, 122), b(4, 123)]),
            ec(28, &[b(22, 45), b(3, 46)]),
            ec(30, &[b(8, 23), b(26, 24)]),
            ec(30, &[b(12, 15), b(28, 16)]),
        ],
    ),
    Version::build(
        28,
        &[6, 26, 50, 74, 98, 122],
        [
            ec(30, &[b(3, 117), b(10, 118)]),
            ec(28, &[b(3, 45), b(23, 46)]),
            ec(30, &[b(4, 24), b(31, 25)]),
            ec(30, &[b(11, 15), b(31, 16)]),
        ],
    ),
    Version::build(
        29,
        &[6, 30, 54, 78, 102, 126],
        [
            ec(30, &[b(7, 116), b(7, 117)]),
            ec(28, &[b(21, 45), b(7, 46)]),
            ec(30, &[b(1, 23), b(37, 24)]),
            ec(30, &[b(19, 15), b(26, 16)]),
        ],
    ),
    Version::build(
        30,
        &[6, 26, 52, 78, 104, 130],
        [
            ec(30, &[b(5, 115), b(10, 116)]),
            ec(28, &[b(19, 47), b(10, 48)]),
            ec(30, &[b(15, 24), b(25, 25)]),
            ec(30, &[b(23, 15), b(25, 16)]),
        ],
    ),
    Version::build(
        31,
        &[6, 30, 56, 82, 108, 134],
        [
            ec(30, &[b(13, 115), b(3, 116)]),
            ec(28, &[b(2, 46), b(29, 47)]),
            ec(30, &[b(42, 24), b(1, 25)]),
            ec(30, &[b(23, 15), b(28, 16)]),
        ],
    ),
    Version::build(
        32,
        &[6, 34, 60, 86, 112, 138],
        [
            ec(30, &[b(17, 115)]),
            ec(28, &[b(10, 46), b(23, 47)]),
            ec(30, &[b(10, 24), b(35, 25)]),
            ec(30, &[b(19, 15), b(35, 16)]),
        ],
    ),
    Version::build(
        33,
        &[6, 30, 58, 86, 114, 142],
        [
            ec(30, &[b(17, 115), b(1, 116)]),
            ec(28, &[b(14, 46), b(21, 47)]),
            ec(30, &[b(29, 24), b(19, 25)]),
            ec(30, &[b(11, 15), b(46, 16)]),
        ],
    ),
    Version::build(
        34,
        &[6, 34, 62, 90, 118, 146],
        [
            ec(30, &[b(13, 115), b(6, 116)]),
            ec(28, &[b(14, 46), b(23, 47)]),
            ec(30, &[b(44, 24), b(7, 25)]),
            ec(30, &[b(59, 16), b(1, 17)]),
        ],
    ),
    Version::build(
        35,
        &[6, 30, 54, 78, 102, 126, 150],
        [
            ec(30, &[b(12, 121), b(7, 122)]),
            ec(28, &[b(12, 47), b(26, 48)]),
            ec(30, &[b(39, 24), b(14, 25)]),
            ec(30, &[b(22, 15), b(41, 16)]),
        ],
    ),
    Version::build(
        36,
        &[6, 24, 50, 76, 102, 128, 154],
        [
            ec(30, &[b(6, 121), b(14, 122)]),
            ec(28, &[b(6, 47), b(34, 48)]),
            ec(30, &[b(46, 24), b(10, 25)]),
            ec(30, &[b(2, 15), b(64, 16)]),
        ],
    ),
    Version::build(
        37,
        &[6, 28, 54, 80, 106, 132, 158],
        [
            ec(30, &[b(17, 122), b(4, 123)]),
            ec(28, &[b(29, 46), b(14, 47)]),
            ec(30, &[b(49, 24), b(10, 25)]),
            ec(30, &[b(24, 15), b(46, 16)]),
        ],
    ),
    Version::build(
        38,
        &[6, 32, 58, 84, 110, 136, 162],
        [
            ec(30, &[b(4, 122), b(18, 123)]),
            ec(28, &[b(13, 46), b(32, 47)]),
            ec(30, &[b(48, 24), b(14, 25)]),
            ec(30, &[b(42, 15), b(32, 16)]),
        ],
    ),
    Version::build(
        39,
        &[6, 26, 54, 82, 110, 138, 166],
        [
            ec(30, &[b(20, 117), b(4, 118)]),
            ec(28, &[b(40, 47), b(7, 48)]),
            ec(30, &[b(43, 24), b(22, 25)]),
            ec(30, &[b(10, 15), b(67, 16)]),
        ],
    ),
    Version::build(
        40,
        &[6, 30, 58, 86, 114, 142, 170],
        [
            ec(30, &[b(19, 118), b(6, 119)]),
            ec(28, &[b(18, 47), b(31, 48)]),
            ec(30, &[b(34, 24), b(34, 25)]),
            ec(30, &[b(20, 15), b(61, 16)]),
        ],
    ),
];
