use crate::geometry::Point;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Default)]
#[strum(serialize_all = "snake_case")]
pub enum KnownLayout {
    #[default]
    Qwerty,
}

/// Row-staggered QWERTY with a 60px pitch. Rows sit at y = 50, 110, 170 and
/// the space bar below them, outside the alpha active region.
const QWERTY_ROWS: [(&str, i32, i32); 3] = [
    ("QWERTYUIOP", 30, 50),
    ("ASDFGHJKL;\"", 50, 110),
    ("ZXCVBNM,.?", 80, 170),
];
const QWERTY_PITCH: i32 = 60;
const QWERTY_SPACE: (i32, i32) = (320, 230);

impl KnownLayout {
    /// Identity and adjacency of every modeled key. A coordinate for a
    /// character missing from this table is rejected at load time.
    pub fn neighbor_table(&self) -> &'static [(char, &'static str)] {
        match self {
            Self::Qwerty => &[
                ('Q', "WA"),
                ('W', "QASE"),
                ('E', "RDSW"),
                ('R', "TFDE"),
                ('T', "YGFR"),
                ('Y', "UHGT"),
                ('U', "IJHY"),
                ('I', "OKJU"),
                ('O', "PLKI"),
                ('P', "LO;"),
                ('A', "QWSZ"),
                ('S', "AWEDXZ"),
                ('D', "SERFCX"),
                ('F', "DRTGVC"),
                ('G', "FTYHBV"),
                ('H', "GYUJNB"),
                ('J', "HUIKMN"),
                ('K', "JIOL,M"),
                ('L', "KOP;.,"),
                (';', "PL.?\""),
                ('"', ";?"),
                ('Z', "ASX"),
                ('X', "ZSDC"),
                ('C', "XDFV"),
                ('V', "CFGB"),
                ('B', "VGHN"),
                ('N', "BHJM"),
                ('M', "NJK,"),
                (',', "MKL."),
                ('.', ",;?L"),
                ('?', ".;\""),
                (' ', "!"),
            ],
        }
    }

    pub fn neighbors_of(&self, c: char) -> Option<&'static str> {
        self.neighbor_table()
            .iter()
            .find(|(id, _)| *id == c)
            .map(|(_, n)| *n)
    }

    /// Built-in pixel centers, used when no coordinate file is supplied.
    pub fn default_centers(&self) -> Vec<(char, Point)> {
        match self {
            Self::Qwerty => {
                let mut centers = Vec::with_capacity(32);
                for (row, x0, y) in QWERTY_ROWS {
                    for (col, c) in row.chars().enumerate() {
                        centers.push((c, Point::new(x0 + col as i32 * QWERTY_PITCH, y)));
                    }
                }
                centers.push((' ', Point::new(QWERTY_SPACE.0, QWERTY_SPACE.1)));
                centers
            }
        }
    }
}
