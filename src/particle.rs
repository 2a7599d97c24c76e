// One glyph in a falling lane. Lane, x, speed and opacity are fixed at creation;
// only the height and the glyph change afterwards.

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub(crate) column_index: usize,
    pub(crate) pos: [f64; 2],
    pub(crate) lane_speed: f64,
    pub(crate) glyph: char,
    pub(crate) opacity: f64,
}

impl Particle {
    pub fn new(
        column_index: usize,
        pos_x: f64,
        pos_y: f64,
        lane_speed: f64,
        glyph: char,
        opacity: f64,
    ) -> Particle {
        Particle {
            column_index,
            pos: [pos_x, pos_y],
            lane_speed,
            glyph,
            opacity,
        }
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn position(&self) -> [f64; 2] {
        self.pos
    }

    pub fn lane_speed(&self) -> f64 {
        self.lane_speed
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }
}
