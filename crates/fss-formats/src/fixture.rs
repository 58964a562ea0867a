//! Synthetic IT module builder for tests.
//!
//! Produces byte buffers with the same layout `load_it` reads: the fixed
//! header, order list, instrument/sample/pattern pointer tables and packed
//! pattern bodies.

use crate::IT_MAGIC;

/// Fields of one packed channel record. `None` fields are left out of the mask.
#[derive(Clone, Copy, Debug, Default)]
pub struct Record {
    pub note: Option<u8>,
    pub instrument: Option<u8>,
    pub volume: Option<u8>,
    pub command: Option<(u8, u8)>,
}

impl Record {
    /// A note with instrument and volume.
    pub fn note(note: u8, instrument: u8, volume: u8) -> Self {
        Self {
            note: Some(note),
            instrument: Some(instrument),
            volume: Some(volume),
            command: None,
        }
    }

    pub fn with_command(mut self, command: u8, value: u8) -> Self {
        self.command = Some((command, value));
        self
    }

    fn mask(&self) -> u8 {
        let mut mask = 0;
        if self.note.is_some() {
            mask |= 0x01;
        }
        if self.instrument.is_some() {
            mask |= 0x02;
        }
        if self.volume.is_some() {
            mask |= 0x04;
        }
        if self.command.is_some() {
            mask |= 0x08;
        }
        mask
    }
}

/// Packed pattern body under construction.
#[derive(Clone, Debug, Default)]
pub struct PatternWriter {
    rows: u16,
    body: Vec<u8>,
}

impl PatternWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of records, each with a fresh mask byte.
    pub fn row(mut self, records: &[(u8, Record)]) -> Self {
        for (channel, record) in records {
            self.body.push((channel + 1) | 0x80);
            self.body.push(record.mask());
            self.body.extend(record.note);
            self.body.extend(record.instrument);
            self.body.extend(record.volume);
            if let Some((command, value)) = record.command {
                self.body.extend([command, value]);
            }
        }
        self.raw_row(&[])
    }

    /// Append a row from already packed record bytes (terminator added).
    pub fn raw_row(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self.body.push(0);
        self.rows += 1;
        self
    }

    pub fn empty_rows(mut self, count: u16) -> Self {
        for _ in 0..count {
            self = self.raw_row(&[]);
        }
        self
    }
}

/// Whole-module builder.
#[derive(Clone, Debug)]
pub struct ModuleBuilder {
    title: String,
    speed: u8,
    tempo: u8,
    instruments: u16,
    samples: u16,
    orders: Vec<u8>,
    patterns: Vec<Option<PatternWriter>>,
}

impl Default for ModuleBuilder {
    fn default() -> Self {
        Self {
            title: String::new(),
            speed: 6,
            tempo: 125,
            instruments: 0,
            samples: 0,
            orders: Vec::new(),
            patterns: Vec::new(),
        }
    }
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    pub fn tempo(mut self, tempo: u8) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn instruments(mut self, count: u16) -> Self {
        self.instruments = count;
        self
    }

    pub fn samples(mut self, count: u16) -> Self {
        self.samples = count;
        self
    }

    pub fn orders(mut self, orders: &[u8]) -> Self {
        self.orders = orders.to_vec();
        self
    }

    pub fn pattern(mut self, pattern: PatternWriter) -> Self {
        self.patterns.push(Some(pattern));
        self
    }

    /// Pattern table entry with offset 0.
    pub fn empty_pattern(mut self) -> Self {
        self.patterns.push(None);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; 0xC0];
        data[..4].copy_from_slice(IT_MAGIC);
        let title = self.title.as_bytes();
        let len = title.len().min(25);
        data[4..4 + len].copy_from_slice(&title[..len]);

        data[0x20..0x22].copy_from_slice(&(self.orders.len() as u16).to_le_bytes());
        data[0x22..0x24].copy_from_slice(&self.instruments.to_le_bytes());
        data[0x24..0x26].copy_from_slice(&self.samples.to_le_bytes());
        data[0x26..0x28].copy_from_slice(&(self.patterns.len() as u16).to_le_bytes());
        data[0x32] = self.speed;
        data[0x33] = self.tempo;

        data.extend_from_slice(&self.orders);
        let pointers = (self.instruments as usize + self.samples as usize) * 4;
        data.resize(data.len() + pointers, 0);

        let table = data.len();
        data.resize(table + self.patterns.len() * 4, 0);

        for (i, pattern) in self.patterns.iter().enumerate() {
            let Some(pattern) = pattern else { continue };
            let offset = data.len() as u32;
            data[table + i * 4..table + i * 4 + 4].copy_from_slice(&offset.to_le_bytes());

            data.extend_from_slice(&(pattern.body.len() as u16).to_le_bytes());
            data.extend_from_slice(&pattern.rows.to_le_bytes());
            data.extend_from_slice(&[0; 4]);
            data.extend_from_slice(&pattern.body);
        }

        data
    }
}
