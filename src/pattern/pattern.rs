// Tue Jan 20 2026 - Alex

use std::fmt;

#[derive(Debug, Clone)]
pub struct Pattern {
    bytes: Vec<u8>,
    mask: Vec<bool>,
}

impl Pattern {
    pub fn new(bytes: Vec<u8>, mask: Vec<bool>) -> Self {
        assert_eq!(bytes.len(), mask.len(), "Pattern bytes and mask must have same length");
        Self { bytes, mask }
    }

    /// Parses `"E8 ?? ?? ?? ?? 0F B7"` style patterns.
    pub fn from_hex(hex: &str) -> Self {
        let mut bytes = Vec::new();
        let mut mask = Vec::new();

        for part in hex.split_whitespace() {
            if part == "??" || part == "?" {
                bytes.push(0);
                mask.push(false);
            } else if let Ok(byte) = u8::from_str_radix(part, 16) {
                bytes.push(byte);
                mask.push(true);
            }
        }

        Self { bytes, mask }
    }

    /// Pattern plus `x`/`?` mask string, one char per byte.
    pub fn with_mask_str(bytes: &[u8], mask: &str) -> Self {
        let mask: Vec<bool> = mask.chars().map(|c| c == 'x').collect();
        assert_eq!(bytes.len(), mask.len(), "Pattern bytes and mask must have same length");
        Self { bytes: bytes.to_vec(), mask }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        if data.len() < self.bytes.len() {
            return false;
        }

        self.bytes.iter()
            .zip(self.mask.iter())
            .zip(data.iter())
            .all(|((pattern_byte, &significant), &data_byte)| {
                !significant || *pattern_byte == data_byte
            })
    }

    pub fn find_in(&self, data: &[u8]) -> Option<usize> {
        if self.bytes.is_empty() || data.len() < self.bytes.len() {
            return None;
        }

        let first_significant = self.mask.iter()
            .position(|&m| m)
            .unwrap_or(0);

        let first_byte = self.bytes[first_significant];

        (0..=(data.len() - self.bytes.len()))
            .find(|&i| data[i + first_significant] == first_byte && self.matches(&data[i..]))
    }

    pub fn to_hex_string(&self) -> String {
        self.bytes.iter()
            .zip(self.mask.iter())
            .map(|(b, &m)| if m { format!("{:02X}", b) } else { "??".to_string() })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes && self.mask == other.mask
    }
}

impl Eq for Pattern {}
