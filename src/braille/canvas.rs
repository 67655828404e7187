/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>, // Bit pattern per char, row-major
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        self.cells[cy * self.width + cx] |= dot_bit(x % 2, y % 4);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Whether the pixel at (x, y) is lit
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let cx = x / 2;
        let cy = y / 4;
        if cx >= self.width || cy >= self.height {
            return false;
        }
        self.cells[cy * self.width + cx] & dot_bit(x % 2, y % 4) != 0
    }

    /// Number of lit pixels across the canvas
    pub fn lit_pixels(&self) -> usize {
        self.cells.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Braille character for the cell at (cx, cy); empty cells yield
    /// the blank pattern U+2800
    pub fn cell_char(&self, cx: usize, cy: usize) -> char {
        let bits = if cx < self.width && cy < self.height {
            self.cells[cy * self.width + cx]
        } else {
            0
        };
        char::from_u32(0x2800 + u32::from(bits)).unwrap_or(' ')
    }

    /// Whether the cell at (cx, cy) has any dots set
    pub fn cell_is_empty(&self, cx: usize, cy: usize) -> bool {
        cx >= self.width || cy >= self.height || self.cells[cy * self.width + cx] == 0
    }

    /// Render the whole canvas as lines of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|cy| {
                (0..self.width)
                    .map(|cx| self.cell_char(cx, cy))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn dot_bit(x: usize, y: usize) -> u8 {
    match (x, y) {
        (0, 0) => 0x01,
        (1, 0) => 0x08,
        (0, 1) => 0x02,
        (1, 1) => 0x10,
        (0, 2) => 0x04,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        _ => 0,
    }
}
