//! Address fields: SMSC and originating address

use super::gsm7::{decode_septets, unpack_septets};
use super::reader::OctetReader;
use super::DecodeError;
use serde_json::{json, Value};

/// Type of number, bits 6-4 of the type-of-address octet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeOfNumber {
    Unknown,
    International,
    National,
    NetworkSpecific,
    SubscriberNumber,
    Alphanumeric,
    Abbreviated,
    Reserved,
}

impl TypeOfNumber {
    pub fn from_toa(toa: u8) -> Self {
        match (toa >> 4) & 0x07 {
            0b000 => TypeOfNumber::Unknown,
            0b001 => TypeOfNumber::International,
            0b010 => TypeOfNumber::National,
            0b011 => TypeOfNumber::NetworkSpecific,
            0b100 => TypeOfNumber::SubscriberNumber,
            0b101 => TypeOfNumber::Alphanumeric,
            0b110 => TypeOfNumber::Abbreviated,
            _ => TypeOfNumber::Reserved,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeOfNumber::Unknown => "unknown",
            TypeOfNumber::International => "international",
            TypeOfNumber::National => "national",
            TypeOfNumber::NetworkSpecific => "network_specific",
            TypeOfNumber::SubscriberNumber => "subscriber_number",
            TypeOfNumber::Alphanumeric => "alphanumeric",
            TypeOfNumber::Abbreviated => "abbreviated",
            TypeOfNumber::Reserved => "reserved",
        }
    }
}

/// Numbering plan identification, bits 3-0 of the type-of-address octet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumberingPlan {
    Unknown,
    Isdn,
    Data,
    Telex,
    ServiceCentreSpecific(u8),
    National,
    Private,
    Ermes,
    Reserved(u8),
}

impl NumberingPlan {
    pub fn from_toa(toa: u8) -> Self {
        match toa & 0x0F {
            0x0 => NumberingPlan::Unknown,
            0x1 => NumberingPlan::Isdn,
            0x3 => NumberingPlan::Data,
            0x4 => NumberingPlan::Telex,
            v @ (0x5 | 0x6) => NumberingPlan::ServiceCentreSpecific(v),
            0x8 => NumberingPlan::National,
            0x9 => NumberingPlan::Private,
            0xA => NumberingPlan::Ermes,
            v => NumberingPlan::Reserved(v),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberingPlan::Unknown => "unknown",
            NumberingPlan::Isdn => "isdn",
            NumberingPlan::Data => "data",
            NumberingPlan::Telex => "telex",
            NumberingPlan::ServiceCentreSpecific(_) => "service_centre_specific",
            NumberingPlan::National => "national",
            NumberingPlan::Private => "private",
            NumberingPlan::Ermes => "ermes",
            NumberingPlan::Reserved(_) => "reserved",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub number: String,
    pub type_of_number: TypeOfNumber,
    pub numbering_plan: NumberingPlan,
}

impl Address {
    /// SMSC information field; length counts octets including the TOA octet
    pub fn read_smsc(reader: &mut OctetReader<'_>) -> Result<Option<Self>, DecodeError> {
        let len = reader.read_u8("smsc length")?;
        if len == 0 {
            return Ok(None);
        }
        let toa = reader.read_u8("smsc type of address")?;
        let digits = reader.read_slice(usize::from(len) - 1, "smsc number")?;
        Ok(Some(Self::from_semi_octets(toa, digits)))
    }

    /// TP-OA; length counts useful semi-octets
    pub fn read_originating(reader: &mut OctetReader<'_>) -> Result<Self, DecodeError> {
        let semi_octets = usize::from(reader.read_u8("sender length")?);
        let toa = reader.read_u8("sender type of address")?;
        let octets = reader.read_slice(semi_octets.div_ceil(2), "sender number")?;

        if TypeOfNumber::from_toa(toa) == TypeOfNumber::Alphanumeric {
            let septets = unpack_septets(octets, semi_octets * 4 / 7);
            return Ok(Self {
                number: decode_septets(&septets),
                type_of_number: TypeOfNumber::Alphanumeric,
                numbering_plan: NumberingPlan::from_toa(toa),
            });
        }

        let mut address = Self::from_semi_octets(toa, octets);
        address.number.truncate(semi_octets + usize::from(address.is_international()));
        Ok(address)
    }

    fn from_semi_octets(toa: u8, octets: &[u8]) -> Self {
        let type_of_number = TypeOfNumber::from_toa(toa);
        let mut number = String::with_capacity(octets.len() * 2 + 1);
        if type_of_number == TypeOfNumber::International {
            number.push('+');
        }
        number.push_str(&decode_semi_octets(octets));

        Self {
            number,
            type_of_number,
            numbering_plan: NumberingPlan::from_toa(toa),
        }
    }

    fn is_international(&self) -> bool {
        self.type_of_number == TypeOfNumber::International
    }

    pub fn to_json(&self) -> Value {
        json!({
            "number": self.number,
            "type_of_number": self.type_of_number.as_str(),
            "numbering_plan": self.numbering_plan.as_str(),
        })
    }
}

/// Swapped-nibble BCD; an `F` nibble pads odd-length numbers
pub fn decode_semi_octets(octets: &[u8]) -> String {
    let mut digits = String::with_capacity(octets.len() * 2);
    for octet in octets {
        for nibble in [octet & 0x0F, octet >> 4] {
            match nibble {
                0..=9 => digits.push(char::from(b'0' + nibble)),
                0xA => digits.push('*'),
                0xB => digits.push('#'),
                0xC => digits.push('a'),
                0xD => digits.push('b'),
                0xE => digits.push('c'),
                _ => return digits,
            }
        }
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::reader::parse_hex;

    #[test]
    fn test_international_smsc() {
        let data = parse_hex("07911326040000F0").unwrap();
        let mut reader = OctetReader::new(&data);
        let smsc = Address::read_smsc(&mut reader).unwrap().unwrap();
        assert_eq!(smsc.number, "+31624000000");
        assert_eq!(smsc.type_of_number, TypeOfNumber::International);
        assert_eq!(smsc.numbering_plan, NumberingPlan::Isdn);
    }

    #[test]
    fn test_empty_smsc() {
        let data = [0x00];
        let mut reader = OctetReader::new(&data);
        assert_eq!(Address::read_smsc(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_originating_odd_length() {
        let data = parse_hex("0B911346610089F6").unwrap();
        let mut reader = OctetReader::new(&data);
        let sender = Address::read_originating(&mut reader).unwrap();
        assert_eq!(sender.number, "+31641600986");
    }

    #[test]
    fn test_originating_national() {
        let data = parse_hex("0AA11032547698").unwrap();
        let mut reader = OctetReader::new(&data);
        let sender = Address::read_originating(&mut reader).unwrap();
        assert_eq!(sender.number, "0123456789");
        assert_eq!(sender.type_of_number, TypeOfNumber::National);
    }

    #[test]
    fn test_alphanumeric_sender() {
        let data = parse_hex("04D0C834").unwrap();
        let mut reader = OctetReader::new(&data);
        let sender = Address::read_originating(&mut reader).unwrap();
        assert_eq!(sender.number, "Hi");
        assert_eq!(sender.type_of_number, TypeOfNumber::Alphanumeric);
    }

    #[test]
    fn test_truncated_sender() {
        let data = parse_hex("0B9113").unwrap();
        let mut reader = OctetReader::new(&data);
        assert_eq!(
            Address::read_originating(&mut reader),
            Err(DecodeError::Truncated {
                field: "sender number"
            })
        );
    }

    #[test]
    fn test_special_semi_octets() {
        assert_eq!(decode_semi_octets(&[0xBA, 0xF1]), "*#1");
    }

    #[test]
    fn test_address_json() {
        let address = Address {
            number: "+15551234567".to_string(),
            type_of_number: TypeOfNumber::International,
            numbering_plan: NumberingPlan::Isdn,
        };
        assert_eq!(address.to_json()["number"], "+15551234567");
        assert_eq!(address.to_json()["type_of_number"], "international");
    }
}
