/// Packed one-dimensional bit storage, 32 bits per word, least significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitArray {
    bits: Vec<u32>,
    size: usize,
}

impl BitArray {
    /// Create an array of `size` cleared bits
    pub fn new(size: usize) -> Self {
        Self {
            bits: vec![0; words_for(size)],
            size,
        }
    }

    /// Number of bits
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bytes needed to hold every bit
    pub fn size_in_bytes(&self) -> usize {
        self.size.div_ceil(8)
    }

    /// Raw 32-bit words backing the array
    pub fn words(&self) -> &[u32] {
        &self.bits
    }

    fn ensure_capacity(&mut self, new_size: usize) {
        let needed = words_for(new_size);
        if needed > self.bits.len() {
            self.bits.resize(needed, 0);
        }
    }

    /// Get bit `i`; bits past the end read as unset
    pub fn get(&self, i: usize) -> bool {
        if i >= self.size {
            return false;
        }
        (self.bits[i / 32] >> (i & 31)) & 1 == 1
    }

    /// Set bit `i`
    pub fn set(&mut self, i: usize) {
        if i < self.size {
            self.bits[i / 32] |= 1 << (i & 31);
        }
    }

    /// Flip bit `i`
    pub fn flip(&mut self, i: usize) {
        if i < self.size {
            self.bits[i / 32] ^= 1 << (i & 31);
        }
    }

    /// Index of the first set bit at or after `from`, or `size()` if none
    pub fn next_set(&self, from: usize) -> usize {
        self.next_matching(from, false)
    }

    /// Index of the first unset bit at or after `from`, or `size()` if none
    pub fn next_unset(&self, from: usize) -> usize {
        self.next_matching(from, true)
    }

    fn next_matching(&self, from: usize, invert: bool) -> usize {
        if from >= self.size {
            return self.size;
        }
        let load = |idx: usize| if invert { !self.bits[idx] } else { self.bits[idx] };
        let mut offset = from / 32;
        let mut current = load(offset) & (!0u32 << (from & 31));
        while current == 0 {
            offset += 1;
            if offset == self.bits.len() {
                return self.size;
            }
            current = load(offset);
        }
        (offset * 32 + current.trailing_zeros() as usize).min(self.size)
    }

    /// Overwrite the 32 bits starting at `i` (which must be a multiple of 32)
    pub fn set_bulk(&mut self, i: usize, new_bits: u32) {
        if let Some(word) = self.bits.get_mut(i / 32) {
            *word = new_bits;
        }
    }

    /// Set every bit in `start..end`; the range is clamped to the array
    pub fn set_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.size);
        if end <= start {
            return;
        }
        let last = end - 1;
        let (first_word, last_word) = (start / 32, last / 32);
        for i in first_word..=last_word {
            self.bits[i] |= range_mask(i, first_word, last_word, start, last);
        }
    }

    /// Clear every bit
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// True when every bit in `start..end` equals `value`
    pub fn is_range(&self, start: usize, end: usize, value: bool) -> bool {
        let end = end.min(self.size);
        if end <= start {
            return true;
        }
        let last = end - 1;
        let (first_word, last_word) = (start / 32, last / 32);
        (first_word..=last_word).all(|i| {
            let mask = range_mask(i, first_word, last_word, start, last);
            self.bits[i] & mask == if value { mask } else { 0 }
        })
    }

    /// Append a single bit, growing the array
    pub fn append_bit(&mut self, bit: bool) {
        self.ensure_capacity(self.size + 1);
        if bit {
            self.bits[self.size / 32] |= 1 << (self.size & 31);
        }
        self.size += 1;
    }

    /// Append the `num_bits` least significant bits of `value`, most significant first
    pub fn append_bits(&mut self, value: u32, num_bits: usize) {
        let num_bits = num_bits.min(32);
        self.ensure_capacity(self.size + num_bits);
        for shift in (0..num_bits).rev() {
            self.append_bit((value >> shift) & 1 == 1);
        }
    }

    /// Append every bit of `other`
    pub fn append_bit_array(&mut self, other: &BitArray) {
        self.ensure_capacity(self.size + other.size);
        for i in 0..other.size {
            self.append_bit(other.get(i));
        }
    }

    /// XOR with another array of the same size; words beyond the shorter array are untouched
    pub fn xor(&mut self, other: &BitArray) {
        for (word, &rhs) in self.bits.iter_mut().zip(other.bits.iter()) {
            *word ^= rhs;
        }
    }

    /// Pack `num_bytes` bytes starting at `bit_offset` into `array[offset..]`, MSB first
    pub fn to_bytes(&self, mut bit_offset: usize, array: &mut [u8], offset: usize, num_bytes: usize) {
        for slot in array.iter_mut().skip(offset).take(num_bytes) {
            let mut byte = 0u8;
            for j in 0..8 {
                if self.get(bit_offset) {
                    byte |= 1 << (7 - j);
                }
                bit_offset += 1;
            }
            *slot = byte;
        }
    }

    /// Reverse bit order in place
    pub fn reverse(&mut self) {
        let mut reversed = vec![0u32; self.bits.len()];
        for i in 0..self.size {
            if self.get(i) {
                let j = self.size - 1 - i;
                reversed[j / 32] |= 1 << (j & 31);
            }
        }
        self.bits = reversed;
    }
}

fn words_for(size: usize) -> usize {
    size.div_ceil(32)
}

fn range_mask(word: usize, first_word: usize, last_word: usize, start: usize, last: usize) -> u32 {
    let first_bit = if word > first_word { 0 } else { start & 31 };
    let last_bit = if word < last_word { 31 } else { last & 31 };
    ((2u64 << last_bit) - (1u64 << first_bit)) as u32
}

impl std::fmt::Display for BitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.size {
            if i % 8 == 0 && i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", if self.get(i) { 'X' } else { '.' })?;
        }
        Ok(())
    }
}
