//! TP-DCS data coding scheme (3GPP TS 23.038, clause 4)

use serde_json::{json, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Alphabet {
    Gsm7,
    EightBit,
    Ucs2,
}

impl Alphabet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alphabet::Gsm7 => "gsm7",
            Alphabet::EightBit => "8bit",
            Alphabet::Ucs2 => "ucs2",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataCodingScheme {
    pub raw: u8,
    pub alphabet: Alphabet,
    /// Message class 0-3 when the scheme carries one
    pub class: Option<u8>,
    pub compressed: bool,
}

impl DataCodingScheme {
    pub fn from_byte(raw: u8) -> Self {
        let class_bits = Some(raw & 0x03);
        let (alphabet, class, compressed) = match raw >> 4 {
            // General data coding and automatic deletion groups
            0x0..=0x7 => {
                let alphabet = match (raw >> 2) & 0x03 {
                    0b01 => Alphabet::EightBit,
                    0b10 => Alphabet::Ucs2,
                    _ => Alphabet::Gsm7,
                };
                let class = if raw & 0x10 != 0 { class_bits } else { None };
                (alphabet, class, raw & 0x20 != 0)
            }
            // Message waiting indication: discard / store (GSM 7-bit)
            0xC | 0xD => (Alphabet::Gsm7, None, false),
            // Message waiting indication: store (UCS-2)
            0xE => (Alphabet::Ucs2, None, false),
            0xF => {
                let alphabet = if raw & 0x04 != 0 {
                    Alphabet::EightBit
                } else {
                    Alphabet::Gsm7
                };
                (alphabet, class_bits, false)
            }
            // Reserved groups are treated as the default alphabet
            _ => (Alphabet::Gsm7, None, false),
        };

        Self {
            raw,
            alphabet,
            class,
            compressed,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "raw": self.raw,
            "encoding": self.alphabet.as_str(),
            "class": self.class,
            "compressed": self.compressed,
        })
    }
}
