//! SBPL command builder for SATO label printers
//!
//! Provides a fluent API for building SBPL command streams, plus the fixed
//! title/barcode label layout used by the broker. All output is Shift-JIS
//! encoded.

use crate::encoding::to_shift_jis;

const STX: char = '\u{02}';
const ETX: char = '\u{03}';
const ESC: char = '\u{1b}';

// Fixed label geometry, in dots at 8 dots/mm (40mm tall, 60mm wide media).
const MEDIA_HEIGHT: u16 = 320;
const MEDIA_WIDTH: u16 = 480;

const TITLE_POSITION: (u16, u16) = (40, 40);
const BARCODE_POSITION: (u16, u16) = (120, 40);
const CAPTION_POSITION: (u16, u16) = (216, 60);

const TITLE_PITCH: u8 = 2;
const TITLE_EXPANSION: (u8, u8) = (2, 2);
const NARROW_BAR: u8 = 3;
const BAR_HEIGHT: u16 = 80;

/// Printer-resident fonts usable with the place-text command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// XS font, used for human-readable barcode captions
    Small,
    /// XM font, used for label titles
    Medium,
}

impl Font {
    fn opcode(self) -> &'static str {
        match self {
            Font::Small => "XS",
            Font::Medium => "XM",
        }
    }
}

/// Barcode symbologies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    /// Code 39, the symbology these labels ship with
    Code39,
}

impl Symbology {
    fn code(self) -> char {
        match self {
            Symbology::Code39 => '1',
        }
    }
}

/// SBPL command builder
///
/// Accumulates the command stream as text and converts to Shift-JIS at the
/// end, so command bytes and field data go through one encoding pass.
pub struct SbplBuilder {
    buf: String,
}

impl SbplBuilder {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(256),
        }
    }

    fn command(&mut self, body: &str) -> &mut Self {
        self.buf.push(ESC);
        self.buf.push_str(body);
        self
    }

    /// Start of transmission: STX followed by ESC A (begin edit)
    pub fn start(&mut self) -> &mut Self {
        self.buf.push(STX);
        self.command("A")
    }

    /// Media size in dots (ESC A1), height then width, four digits each
    pub fn media_size(&mut self, height: u16, width: u16) -> &mut Self {
        self.command(&format!("A1{height:04}{width:04}"))
    }

    /// Field origin: vertical (ESC V) then horizontal (ESC H), in dots
    pub fn position(&mut self, vertical: u16, horizontal: u16) -> &mut Self {
        self.command(&format!("V{vertical:04}"));
        self.command(&format!("H{horizontal:04}"))
    }

    /// Character pitch in dots (ESC P)
    pub fn pitch(&mut self, dots: u8) -> &mut Self {
        self.command(&format!("P{dots:02}"))
    }

    /// Character expansion multipliers (ESC L), width then height
    pub fn expansion(&mut self, width: u8, height: u8) -> &mut Self {
        self.command(&format!("L{width:02}{height:02}"))
    }

    /// Place text at the current position; the payload is substituted verbatim
    pub fn text(&mut self, font: Font, s: &str) -> &mut Self {
        self.command(font.opcode());
        self.buf.push_str(s);
        self
    }

    /// Place a barcode: symbology, narrow-bar width and bar height in dots
    pub fn barcode(
        &mut self,
        symbology: Symbology,
        narrow: u8,
        height: u16,
        data: &str,
    ) -> &mut Self {
        self.command(&format!("B{}{narrow:02}{height:03}", symbology.code()));
        self.buf.push_str(data);
        self
    }

    /// Print quantity (ESC Q)
    pub fn quantity(&mut self, copies: u32) -> &mut Self {
        self.command(&format!("Q{copies}"))
    }

    /// End of transmission: ESC Z followed by ETX
    pub fn end(&mut self) -> &mut Self {
        self.command("Z");
        self.buf.push(ETX);
        self
    }

    /// Encode the accumulated command stream as Shift-JIS bytes
    pub fn encode(self) -> Vec<u8> {
        to_shift_jis(&self.buf)
    }
}

impl Default for SbplBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a title/barcode pair as a complete SBPL print job.
///
/// Pure function: identical inputs always produce byte-identical output.
/// The layout is fixed — a double-size title line, a Code 39 barcode and a
/// small-font human-readable caption underneath it, one copy.
pub fn encode_label(title: &str, barcode: &str) -> Vec<u8> {
    // Code 39 start/stop delimiters. A `*` inside the value would break the
    // framing; values are substituted verbatim, not validated.
    let framed = format!("*{barcode}*");

    let mut fields = SbplBuilder::new();
    fields
        .start()
        .media_size(MEDIA_HEIGHT, MEDIA_WIDTH)
        .position(TITLE_POSITION.0, TITLE_POSITION.1)
        .pitch(TITLE_PITCH)
        .expansion(TITLE_EXPANSION.0, TITLE_EXPANSION.1)
        .text(Font::Medium, title)
        .position(BARCODE_POSITION.0, BARCODE_POSITION.1)
        .barcode(Symbology::Code39, NARROW_BAR, BAR_HEIGHT, &framed)
        .position(CAPTION_POSITION.0, CAPTION_POSITION.1)
        .text(Font::Small, &framed);

    let mut issue = SbplBuilder::new();
    issue.quantity(1).end();

    // The two halves are encoded separately and concatenated. Both end on
    // complete commands and Shift-JIS is stateless, so the join cannot
    // reorder bytes or split a multi-byte sequence.
    let mut bytes = fields.encode();
    bytes.extend_from_slice(&issue.encode());
    bytes
}
