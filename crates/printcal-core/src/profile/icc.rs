//! ICC v2.4 matrix/TRC profile encoding.
//!
//! Layout: 128-byte header, tag count, 12-byte tag entries, then tag data.
//! Every multi-byte field is big-endian and every tag starts on a 4-byte
//! boundary. Recorded tag sizes exclude padding; the header size includes it.
//!
//! The matrix/TRC tag set is only defined for input and display profiles;
//! output ('prtr') profiles require AToB/BToA lookup tables and are refused.

use chrono::{Datelike, Timelike};
use tracing::debug;

use super::curves::sample_curve;
use crate::color::Xyz;
use crate::error::{CalibrationError, Result};
use crate::models::{Channel, ColorProfile, DeviceClass, Signature, ToneCurve};

const HEADER_SIZE: usize = 128;
const TAG_ENTRY_SIZE: usize = 12;

/// Version 2.4.0
const PROFILE_VERSION: u32 = 0x0240_0000;

/// PCS illuminant (0.9642, 1.0, 0.8249) as fixed-point header values
const PCS_ILLUMINANT: [u32; 3] = [0x0000_F6D6, 0x0001_0000, 0x0000_D32D];

/// Bytes reserved for the Macintosh ScriptCode string in textDescriptionType
const SCRIPTCODE_LENGTH: usize = 67;

struct Tag {
    signature: [u8; 4],
    data: Vec<u8>,
}

/// Encode `profile` with `table_size` entries per TRC
pub(crate) fn encode_profile(profile: &ColorProfile, table_size: usize) -> Result<Vec<u8>> {
    if profile.device_class == DeviceClass::Output {
        return Err(CalibrationError::Serialization(
            "output device profiles need lookup-table tags; use the display or input class \
             for a matrix/TRC profile"
                .to_string(),
        ));
    }
    // One entry would be read as a gamma value, zero as identity
    if table_size < 2 {
        return Err(CalibrationError::Serialization(format!(
            "curve table needs at least 2 entries, got {}",
            table_size
        )));
    }

    let mut tags = vec![
        Tag {
            signature: *b"desc",
            data: text_description(&profile.metadata.description)?,
        },
        Tag {
            signature: *b"cprt",
            data: text(&profile.metadata.copyright),
        },
        Tag {
            signature: *b"wtpt",
            data: xyz_type(profile.white_point)?,
        },
    ];
    for (channel, signature) in Channel::ALL.into_iter().zip([*b"rXYZ", *b"gXYZ", *b"bXYZ"]) {
        tags.push(Tag {
            signature,
            data: xyz_type(profile.colorant(channel))?,
        });
    }
    for (channel, signature) in Channel::ALL.into_iter().zip([*b"rTRC", *b"gTRC", *b"bTRC"]) {
        let curve = profile.tone_curve(channel).ok_or_else(|| {
            CalibrationError::Serialization(format!("Missing tone curve for {} channel", channel))
        })?;
        tags.push(Tag {
            signature,
            data: curve_type(curve, table_size)?,
        });
    }

    let table_len = 4 + TAG_ENTRY_SIZE * tags.len();
    let mut table = Vec::with_capacity(table_len);
    table.extend_from_slice(&to_u32(tags.len(), "tag count")?.to_be_bytes());

    let mut body = Vec::new();
    let data_start = HEADER_SIZE + table_len;
    for tag in &tags {
        let offset = data_start + body.len();
        table.extend_from_slice(&tag.signature);
        table.extend_from_slice(&to_u32(offset, "tag offset")?.to_be_bytes());
        table.extend_from_slice(&to_u32(tag.data.len(), "tag size")?.to_be_bytes());
        body.extend_from_slice(&tag.data);
        pad_to_four(&mut body);
    }

    let total = data_start + body.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&header(profile, to_u32(total, "profile size")?)?);
    out.extend_from_slice(&table);
    out.extend_from_slice(&body);

    debug!(bytes = out.len(), tags = tags.len(), "Encoded ICC profile");
    Ok(out)
}

fn header(profile: &ColorProfile, size: u32) -> Result<[u8; HEADER_SIZE]> {
    let mut h = [0u8; HEADER_SIZE];
    put_u32(&mut h, 0, size);
    // 4..8 preferred CMM: none
    put_u32(&mut h, 8, PROFILE_VERSION);
    h[12..16].copy_from_slice(&profile.device_class.signature().0);
    h[16..20].copy_from_slice(b"RGB ");
    h[20..24].copy_from_slice(b"XYZ ");

    let date = profile.metadata.creation_date;
    let year = u16::try_from(date.year()).map_err(|_| {
        CalibrationError::Serialization(format!("Year {} does not fit dateTimeNumber", date.year()))
    })?;
    let fields = [
        year,
        date.month() as u16,
        date.day() as u16,
        date.hour() as u16,
        date.minute() as u16,
        date.second() as u16,
    ];
    for (i, value) in fields.into_iter().enumerate() {
        h[24 + i * 2..26 + i * 2].copy_from_slice(&value.to_be_bytes());
    }

    h[36..40].copy_from_slice(b"acsp");
    // 40..64 platform, flags, manufacturer, model, attributes: zero
    put_u32(&mut h, 64, profile.rendering_intent.code());
    for (i, value) in PCS_ILLUMINANT.into_iter().enumerate() {
        put_u32(&mut h, 68 + i * 4, value);
    }
    put_signature(&mut h, 80, profile.creator);
    // 84..100 profile ID, 100..128 reserved: zero
    Ok(h)
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn put_signature(buf: &mut [u8], at: usize, signature: Signature) {
    buf[at..at + 4].copy_from_slice(&signature.0);
}

fn pad_to_four(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        CalibrationError::Serialization(format!("{} {} exceeds 32 bits", what, value))
    })
}

/// Encode a value as s15Fixed16Number
pub(crate) fn s15_fixed16(value: f64) -> Result<i32> {
    const MAX: f64 = i32::MAX as f64 / 65536.0;
    const MIN: f64 = i32::MIN as f64 / 65536.0;
    if !value.is_finite() || !(MIN..=MAX).contains(&value) {
        return Err(CalibrationError::Serialization(format!(
            "{} is outside the s15Fixed16 range",
            value
        )));
    }
    Ok((value * 65536.0).round() as i32)
}

fn xyz_type(xyz: Xyz) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(20);
    data.extend_from_slice(b"XYZ ");
    data.extend_from_slice(&[0; 4]);
    for component in xyz.to_array() {
        data.extend_from_slice(&s15_fixed16(component)?.to_be_bytes());
    }
    Ok(data)
}

fn curve_type(curve: &ToneCurve, table_size: usize) -> Result<Vec<u8>> {
    let samples = sample_curve(curve, table_size);
    let mut data = Vec::with_capacity(12 + samples.len() * 2);
    data.extend_from_slice(b"curv");
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&to_u32(samples.len(), "curve entry count")?.to_be_bytes());
    for value in samples {
        let encoded = (value.clamp(0.0, 1.0) * 65535.0).round() as u16;
        data.extend_from_slice(&encoded.to_be_bytes());
    }
    Ok(data)
}

/// Printable ASCII rendition; anything else becomes '?'
fn ascii_lossy(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect()
}

fn text(s: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(9 + s.len());
    data.extend_from_slice(b"text");
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&ascii_lossy(s));
    data.push(0);
    data
}

/// textDescriptionType: ASCII, then Unicode (only when the ASCII form is
/// lossy), then an empty ScriptCode block.
fn text_description(s: &str) -> Result<Vec<u8>> {
    let ascii = ascii_lossy(s);
    let mut data = Vec::new();
    data.extend_from_slice(b"desc");
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&to_u32(ascii.len() + 1, "description length")?.to_be_bytes());
    data.extend_from_slice(&ascii);
    data.push(0);

    data.extend_from_slice(&[0; 4]); // Unicode language code
    let lossy = s.chars().any(|c| !c.is_ascii() || c.is_ascii_control());
    if lossy {
        let units: Vec<u16> = s.encode_utf16().chain(std::iter::once(0)).collect();
        data.extend_from_slice(&to_u32(units.len(), "description length")?.to_be_bytes());
        for unit in units {
            data.extend_from_slice(&unit.to_be_bytes());
        }
    } else {
        data.extend_from_slice(&[0; 4]);
    }

    data.extend_from_slice(&[0; 2]); // ScriptCode code
    data.push(0); // ScriptCode count
    data.extend_from_slice(&[0; SCRIPTCODE_LENGTH]);
    Ok(data)
}
