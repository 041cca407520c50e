//! Nuclear species carried by the composition vector.

use std::fmt;

/// Isotopes the model builder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    H1,
    He4,
    C12,
    N14,
    O16,
    Ne20,
    Ne23,
    Na23,
    Mg23,
    Mg24,
    Fe56,
}

impl Species {
    pub const COUNT: usize = 11;

    pub const ALL: [Species; Species::COUNT] = [
        Species::H1,
        Species::He4,
        Species::C12,
        Species::N14,
        Species::O16,
        Species::Ne20,
        Species::Ne23,
        Species::Na23,
        Species::Mg23,
        Species::Mg24,
        Species::Fe56,
    ];

    /// Position in the dense composition vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(&self) -> &'static str {
        match self {
            Species::H1 => "H1",
            Species::He4 => "He4",
            Species::C12 => "C12",
            Species::N14 => "N14",
            Species::O16 => "O16",
            Species::Ne20 => "Ne20",
            Species::Ne23 => "Ne23",
            Species::Na23 => "Na23",
            Species::Mg23 => "Mg23",
            Species::Mg24 => "Mg24",
            Species::Fe56 => "Fe56",
        }
    }

    /// Long name, used as the variable label in written profiles.
    pub fn long_name(&self) -> &'static str {
        match self {
            Species::H1 => "hydrogen-1",
            Species::He4 => "helium-4",
            Species::C12 => "carbon-12",
            Species::N14 => "nitrogen-14",
            Species::O16 => "oxygen-16",
            Species::Ne20 => "neon-20",
            Species::Ne23 => "neon-23",
            Species::Na23 => "sodium-23",
            Species::Mg23 => "magnesium-23",
            Species::Mg24 => "magnesium-24",
            Species::Fe56 => "iron-56",
        }
    }

    /// Mass number A.
    pub fn mass_number(&self) -> f64 {
        match self {
            Species::H1 => 1.0,
            Species::He4 => 4.0,
            Species::C12 => 12.0,
            Species::N14 => 14.0,
            Species::O16 => 16.0,
            Species::Ne20 => 20.0,
            Species::Ne23 | Species::Na23 | Species::Mg23 => 23.0,
            Species::Mg24 => 24.0,
            Species::Fe56 => 56.0,
        }
    }

    /// Proton number Z.
    pub fn charge(&self) -> f64 {
        match self {
            Species::H1 => 1.0,
            Species::He4 => 2.0,
            Species::C12 => 6.0,
            Species::N14 => 7.0,
            Species::O16 => 8.0,
            Species::Ne20 | Species::Ne23 => 10.0,
            Species::Na23 => 11.0,
            Species::Mg23 | Species::Mg24 => 12.0,
            Species::Fe56 => 26.0,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Species::ALL
            .iter()
            .copied()
            .find(|sp| {
                sp.key().eq_ignore_ascii_case(wanted) || sp.long_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or("unknown species")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_table_order() {
        for (i, sp) in Species::ALL.iter().enumerate() {
            assert_eq!(sp.index(), i);
        }
    }

    #[test]
    fn parse_key_and_long_name() {
        assert_eq!("C12".parse::<Species>(), Ok(Species::C12));
        assert_eq!("carbon-12".parse::<Species>(), Ok(Species::C12));
        assert_eq!(" he4 ".parse::<Species>(), Ok(Species::He4));
        assert!("unobtainium".parse::<Species>().is_err());
    }

    #[test]
    fn urca_pair_shares_mass_number() {
        assert_eq!(Species::Ne23.mass_number(), Species::Na23.mass_number());
        assert_eq!(Species::Na23.charge() - Species::Ne23.charge(), 1.0);
    }
}
