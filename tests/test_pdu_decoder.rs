//! SMS-DELIVER decoding through the public decoder boundary
//!
//! Vectors are real-world shaped PDUs as MikroTik logs them, including the
//! leading SMSC information field.

use mikrotik_sms_gateway::pdu::{DecodeError, PduDecoder, SmsDeliverDecoder};
use mikrotik_sms_gateway::sms::DecodedSms;
use serde_json::Value;

const CLASSIC: &str =
    "07911326040000F0040B911346610089F60000208062917314080CC8F71D14969741F977FD07";
const UCS2: &str = "00040B911346610089F60008423051010300800C041F04400438043204350442";
const ALPHANUMERIC: &str = "000404D0C834000042305101030080 0AE8329BFD4697D9EC37";
const CONCATENATED: &str = "00440B911346610089F6000042305101030080 09050003CC02019069";

fn decode(hex: &str) -> Result<DecodedSms, DecodeError> {
    SmsDeliverDecoder::new().decode(&hex.replace(' ', ""))
}

fn payload_json(sms: &DecodedSms) -> Value {
    serde_json::from_slice(&sms.to_payload().unwrap()).unwrap()
}

#[test]
fn test_classic_payload_shape() {
    let json = payload_json(&decode(CLASSIC).unwrap());

    assert_eq!(json["sender"]["number"], "+31641600986");
    assert_eq!(json["sender"]["type_of_number"], "international");
    assert_eq!(json["smsc"]["number"], "+31624000000");
    assert_eq!(json["scts"], 1030390661);
    assert_eq!(json["dcs"]["encoding"], "gsm7");
    assert_eq!(json["header"]["message_type"], "deliver");
    assert_eq!(json["user_data"]["data"], "How are you?");
}

#[test]
fn test_ucs2_body() {
    let sms = decode(UCS2).unwrap();

    assert_eq!(sms.body(), Some("Привет"));
    assert_eq!(sms.scts.unwrap().timestamp(), 1710491400);
    assert!(payload_json(&sms)["smsc"].is_null());
}

#[test]
fn test_alphanumeric_sender() {
    let sms = decode(ALPHANUMERIC).unwrap();

    assert_eq!(sms.sender_number(), "Hi");
    assert_eq!(payload_json(&sms)["sender"]["type_of_number"], "alphanumeric");
    assert_eq!(sms.body(), Some("hellohello"));
}

#[test]
fn test_concatenated_part() {
    let sms = decode(CONCATENATED).unwrap();
    let json = payload_json(&sms);

    assert_eq!(sms.body(), Some("Hi"));
    assert_eq!(json["header"]["user_data_header"], true);
    let concat = &json["user_data"]["header"]["concat"];
    assert_eq!(concat["reference"], 204);
    assert_eq!(concat["parts"], 2);
    assert_eq!(concat["sequence"], 1);
}

#[test]
fn test_malformed_pdus_are_decode_errors() {
    assert_eq!(decode("0G"), Err(DecodeError::InvalidHex));
    assert_eq!(decode("07911"), Err(DecodeError::InvalidHex));
    assert!(matches!(decode("0791"), Err(DecodeError::Truncated { .. })));
    assert!(matches!(
        decode("0011"),
        Err(DecodeError::UnsupportedMessageType(_))
    ));
}

#[test]
fn test_truncated_user_data_is_rejected() {
    // Drop the last octet of the classic PDU
    let truncated = &CLASSIC[..CLASSIC.len() - 2];
    assert!(decode(truncated).is_err());
}
