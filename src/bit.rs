// Copyright (c) 2026 rezky_nightky

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
    Blank,
}

impl Bit {
    pub fn glyph(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
            Bit::Blank => ' ',
        }
    }
}

// Partitions [0,1) into three outcomes. Callers uphold
// p_zero + p_one <= 1; nothing is validated here.
pub fn generate<R: Rng>(rng: &mut R, p_zero: f64, p_one: f64) -> Bit {
    let r: f64 = rng.random();
    if p_zero > 0.0 && r <= p_zero {
        return Bit::Zero;
    }
    if p_one > 0.0 && r <= p_zero + p_one {
        return Bit::One;
    }
    Bit::Blank
}
