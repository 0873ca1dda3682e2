//! SMS-DELIVER decoder (3GPP TS 23.040, 9.2.2.1)

use super::address::Address;
use super::dcs::{Alphabet, DataCodingScheme};
use super::gsm7::{decode_septets, unpack_septets};
use super::reader::{parse_hex, OctetReader};
use super::{DecodeError, PduDecoder};
use crate::sms::{DecodedSms, SenderAddress};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde_json::{json, Map, Value};

const MTI_DELIVER: u8 = 0b00;

/// Decoder for SMS-DELIVER PDUs prefixed with the SMSC information field
#[derive(Debug, Clone, Copy, Default)]
pub struct SmsDeliverDecoder;

impl SmsDeliverDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PduDecoder for SmsDeliverDecoder {
    fn decode(&self, pdu_hex: &str) -> Result<DecodedSms, DecodeError> {
        let data = parse_hex(pdu_hex)?;
        let mut reader = OctetReader::new(&data);

        let smsc = Address::read_smsc(&mut reader)?;
        let first_octet = reader.read_u8("first octet")?;
        let mti = first_octet & 0x03;
        if mti != MTI_DELIVER {
            return Err(DecodeError::UnsupportedMessageType(mti));
        }
        let udhi = first_octet & 0x40 != 0;

        let sender = Address::read_originating(&mut reader)?;
        let pid = reader.read_u8("protocol identifier")?;
        let dcs = DataCodingScheme::from_byte(reader.read_u8("data coding scheme")?);
        let scts = decode_timestamp(reader.read_slice(7, "service centre timestamp")?)?;
        let udl = usize::from(reader.read_u8("user data length")?);
        let user_data = decode_user_data(reader.rest(), udl, udhi, &dcs)?;

        let mut sender_extra = Map::new();
        sender_extra.insert(
            "type_of_number".to_string(),
            json!(sender.type_of_number.as_str()),
        );
        sender_extra.insert(
            "numbering_plan".to_string(),
            json!(sender.numbering_plan.as_str()),
        );

        let mut fields = Map::new();
        fields.insert(
            "smsc".to_string(),
            smsc.map_or(Value::Null, |smsc| smsc.to_json()),
        );
        fields.insert("header".to_string(), header_json(first_octet));
        fields.insert("pid".to_string(), json!(pid));
        fields.insert("dcs".to_string(), dcs.to_json());
        fields.insert("user_data".to_string(), user_data);

        Ok(DecodedSms {
            sender: SenderAddress {
                number: Some(sender.number),
                extra: sender_extra,
            },
            scts: Some(scts),
            fields,
        })
    }
}

fn header_json(first_octet: u8) -> Value {
    json!({
        "message_type": "deliver",
        // TP-MMS is inverted: 0 means more messages are waiting
        "more_messages_to_send": first_octet & 0x04 == 0,
        "loop_prevention": first_octet & 0x08 != 0,
        "status_report_indication": first_octet & 0x20 != 0,
        "user_data_header": first_octet & 0x40 != 0,
        "reply_path": first_octet & 0x80 != 0,
    })
}

fn bcd(octet: u8) -> Result<u32, DecodeError> {
    let (tens, units) = (octet & 0x0F, octet >> 4);
    if tens > 9 || units > 9 {
        return Err(DecodeError::InvalidTimestamp);
    }
    Ok(u32::from(tens) * 10 + u32::from(units))
}

/// TP-SCTS: seven swapped semi-octets, the last one a signed quarter-hour offset
pub fn decode_timestamp(octets: &[u8]) -> Result<DateTime<Utc>, DecodeError> {
    let &[year, month, day, hour, minute, second, tz] = octets else {
        return Err(DecodeError::InvalidTimestamp);
    };

    let tz_units = tz >> 4;
    if tz_units > 9 {
        return Err(DecodeError::InvalidTimestamp);
    }
    let quarters = i32::from(tz & 0x07) * 10 + i32::from(tz_units);
    let offset_secs = quarters * 15 * 60;
    let offset = if tz & 0x08 != 0 {
        FixedOffset::west_opt(offset_secs)
    } else {
        FixedOffset::east_opt(offset_secs)
    }
    .ok_or(DecodeError::InvalidTimestamp)?;

    let local = NaiveDate::from_ymd_opt(2000 + bcd(year)? as i32, bcd(month)?, bcd(day)?)
        .and_then(|date| date.and_hms_opt(bcd(hour).ok()?, bcd(minute).ok()?, bcd(second).ok()?))
        .ok_or(DecodeError::InvalidTimestamp)?;

    offset
        .from_local_datetime(&local)
        .single()
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok_or(DecodeError::InvalidTimestamp)
}

/// Concatenated short message reference (IEI 0x00 or 0x08)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Concatenation {
    pub reference: u16,
    pub parts: u8,
    pub sequence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataHeader {
    pub elements: Vec<(u8, Vec<u8>)>,
}

impl UserDataHeader {
    pub fn parse(octets: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = OctetReader::new(octets);
        let mut elements = Vec::new();
        while let Ok(iei) = reader.read_u8("information element") {
            let len = reader.read_u8("information element length")?;
            let data = reader.read_slice(usize::from(len), "information element data")?;
            elements.push((iei, data.to_vec()));
        }
        Ok(Self { elements })
    }

    pub fn concatenation(&self) -> Option<Concatenation> {
        self.elements.iter().find_map(|(iei, data)| match (iei, data.as_slice()) {
            (0x00, [reference, parts, sequence]) => Some(Concatenation {
                reference: u16::from(*reference),
                parts: *parts,
                sequence: *sequence,
            }),
            (0x08, [hi, lo, parts, sequence]) => Some(Concatenation {
                reference: u16::from_be_bytes([*hi, *lo]),
                parts: *parts,
                sequence: *sequence,
            }),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Value {
        let elements: Vec<Value> = self
            .elements
            .iter()
            .map(|(iei, data)| json!({ "iei": iei, "data": to_hex(data) }))
            .collect();
        let concat = self.concatenation().map(|c| {
            json!({ "reference": c.reference, "parts": c.parts, "sequence": c.sequence })
        });
        json!({ "elements": elements, "concat": concat })
    }
}

fn to_hex(octets: &[u8]) -> String {
    octets.iter().map(|b| format!("{b:02X}")).collect()
}

fn decode_ucs2(octets: &[u8]) -> String {
    let units = octets
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// TP-UD; `udl` counts septets for GSM 7-bit and octets otherwise
fn decode_user_data(
    rest: &[u8],
    udl: usize,
    udhi: bool,
    dcs: &DataCodingScheme,
) -> Result<Value, DecodeError> {
    if dcs.compressed {
        return Err(DecodeError::Unsupported("compressed user data".to_string()));
    }

    let octet_len = match dcs.alphabet {
        Alphabet::Gsm7 => (udl * 7).div_ceil(8),
        Alphabet::EightBit | Alphabet::Ucs2 => udl,
    };
    let ud = rest
        .get(..octet_len)
        .ok_or(DecodeError::Truncated { field: "user data" })?;

    let (header, header_len) = if udhi {
        let udhl = usize::from(
            *ud.first()
                .ok_or(DecodeError::Truncated { field: "user data header" })?,
        );
        let octets = ud
            .get(1..1 + udhl)
            .ok_or(DecodeError::Truncated { field: "user data header" })?;
        (Some(UserDataHeader::parse(octets)?), 1 + udhl)
    } else {
        (None, 0)
    };

    let data = match dcs.alphabet {
        Alphabet::Gsm7 => {
            // Header plus fill bits occupy whole septets
            let skip = (header_len * 8).div_ceil(7);
            let septets = unpack_septets(ud, udl);
            decode_septets(septets.get(skip..).unwrap_or_default())
        }
        Alphabet::Ucs2 => decode_ucs2(&ud[header_len..]),
        Alphabet::EightBit => to_hex(&ud[header_len..]),
    };

    Ok(json!({
        "data": data,
        "header": header.map(|h| h.to_json()),
    }))
}
