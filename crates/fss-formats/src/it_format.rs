//! Impulse Tracker module header and loader.

use binrw::io::{Cursor, SeekFrom};
use binrw::BinRead;
use fss_ir::{Module, OrderEntry};

use crate::it_pattern::decode_pattern;
use crate::FormatError;

/// Magic bytes at offset 0 of every IT module.
pub const IT_MAGIC: &[u8; 4] = b"IMPM";

/// Fixed IT header plus the order list and pointer tables that follow it.
#[derive(BinRead, Debug, Clone)]
#[br(little, magic = b"IMPM")]
pub struct ItHeader {
    pub title: [u8; 26],
    #[br(seek_before = SeekFrom::Start(0x20))]
    pub order_count: u16,
    pub instrument_count: u16,
    pub sample_count: u16,
    pub pattern_count: u16,
    #[br(seek_before = SeekFrom::Start(0x32))]
    pub initial_speed: u8,
    pub initial_tempo: u8,
    #[br(seek_before = SeekFrom::Start(0xC0), count = order_count)]
    pub orders: Vec<u8>,
    #[br(count = instrument_count)]
    pub instrument_offsets: Vec<u32>,
    #[br(count = sample_count)]
    pub sample_offsets: Vec<u32>,
    #[br(count = pattern_count)]
    pub pattern_offsets: Vec<u32>,
}

impl ItHeader {
    /// Read the header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.get(..4) != Some(IT_MAGIC.as_slice()) {
            return Err(FormatError::BadMagic);
        }
        ItHeader::read(&mut Cursor::new(data)).map_err(|e| {
            if e.is_eof() {
                FormatError::Truncated
            } else {
                FormatError::Header(e.to_string())
            }
        })
    }

    /// Song title with the NUL padding removed.
    pub fn title(&self) -> String {
        parse_string(&self.title)
    }
}

/// Load an IT file from bytes, keeping the pattern data of `channel`.
pub fn load_it(data: &[u8], channel: u8) -> Result<Module, FormatError> {
    let header = ItHeader::parse(data)?;

    let title = header.title();
    let mut module = Module::new(&title, header.initial_tempo, header.initial_speed);
    module.instrument_count = header.instrument_count;
    module.sample_count = header.sample_count;
    module.order = header.orders.iter().map(|&b| OrderEntry::from_raw(b)).collect();

    tracing::info!(
        title = %title,
        orders = header.order_count,
        instruments = header.instrument_count,
        samples = header.sample_count,
        patterns = header.pattern_count,
        speed = header.initial_speed,
        tempo = header.initial_tempo,
        "loaded IT header"
    );

    // Every order that is played must point into the pattern table
    for (order, entry) in module.order.iter().enumerate() {
        match *entry {
            OrderEntry::End => break,
            OrderEntry::Pattern(idx) if idx as usize >= header.pattern_offsets.len() => {
                return Err(FormatError::UnknownPattern { order, pattern: idx });
            }
            _ => {}
        }
    }

    for &offset in &header.pattern_offsets {
        module.patterns.push(decode_pattern(data, offset, channel)?);
    }

    Ok(module)
}

/// Parse a null-terminated string from bytes.
fn parse_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).trim().to_string()
}
