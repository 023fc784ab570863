//! Bus-level MCP3550 pair model
//!
//! Models the two converters as one unit since they share select and
//! clock: a loaded sample makes the pair "ready", selecting a ready pair
//! drives DATA1 low as the conversion-ready flag, and each falling clock
//! edge shifts the next bit of both 24-bit words onto the data lines.
//! Reselecting after a full readout restarts the conversion, which is
//! how the firmware retriggers sampling.

pub struct Mcp3550Model {
    word_a: u32,
    word_b: u32,
    ready: bool,
    consumed: bool,
    selected: bool,
    cursor: u8,
    out1: bool,
    out2: bool,
    retriggers: usize,
}

impl Mcp3550Model {
    pub fn new() -> Self {
        Self {
            word_a: 0,
            word_b: 0,
            ready: false,
            consumed: false,
            selected: false,
            cursor: 0,
            out1: true,
            out2: true,
            retriggers: 0,
        }
    }

    /// Complete a conversion with the given channel words.
    pub fn load_sample(&mut self, a: [u8; 3], b: [u8; 3]) {
        self.word_a = u32::from_be_bytes([0, a[0], a[1], a[2]]);
        self.word_b = u32::from_be_bytes([0, b[0], b[1], b[2]]);
        self.ready = true;
        self.consumed = false;
    }

    pub fn select(&mut self) {
        self.selected = true;
        self.cursor = 0;
        if self.ready && self.consumed {
            // Select bounce after a full readout restarts the conversion
            self.ready = false;
            self.consumed = false;
            self.retriggers += 1;
            self.out1 = true;
            self.out2 = true;
        } else if self.ready {
            // Conversion-ready flag
            self.out1 = false;
            self.out2 = false;
        } else {
            self.out1 = true;
            self.out2 = true;
        }
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Falling clock edge; shifts the next bit of both words out.
    pub fn clock_fall(&mut self) {
        if self.selected && self.ready && !self.consumed && self.cursor < 24 {
            self.cursor += 1;
            let shift = 24 - self.cursor;
            self.out1 = (self.word_a >> shift) & 1 == 1;
            self.out2 = (self.word_b >> shift) & 1 == 1;
            if self.cursor == 24 {
                self.consumed = true;
            }
        }
    }

    pub fn out1(&self) -> bool {
        self.out1
    }

    pub fn out2(&self) -> bool {
        self.out2
    }

    pub fn retriggers(&self) -> usize {
        self.retriggers
    }
}

impl Default for Mcp3550Model {
    fn default() -> Self {
        Self::new()
    }
}
