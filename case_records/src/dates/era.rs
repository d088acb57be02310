//! Japanese calendar eras.

use serde::{Deserialize, Serialize};

/// The five modern eras, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era {
    Reiwa,
    Heisei,
    Showa,
    Taisho,
    Meiji,
}

impl Era {
    pub const ALL: [Era; 5] = [Era::Reiwa, Era::Heisei, Era::Showa, Era::Taisho, Era::Meiji];

    /// The era name as written in dates.
    pub fn name(&self) -> &'static str {
        match self {
            Era::Reiwa => "令和",
            Era::Heisei => "平成",
            Era::Showa => "昭和",
            Era::Taisho => "大正",
            Era::Meiji => "明治",
        }
    }

    /// Gregorian year of era year zero; era year `n` is `base_year() + n`.
    pub fn base_year(&self) -> i32 {
        match self {
            Era::Reiwa => 2018,
            Era::Heisei => 1988,
            Era::Showa => 1925,
            Era::Taisho => 1911,
            Era::Meiji => 1867,
        }
    }

    /// Look up an era by its written name.
    pub fn from_name(name: &str) -> Option<Era> {
        Era::ALL.into_iter().find(|era| era.name() == name)
    }

    /// Convert an era-relative year to a Gregorian year, `None` on overflow.
    pub fn to_gregorian(&self, era_year: i32) -> Option<i32> {
        self.base_year().checked_add(era_year)
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_lookup() {
        assert_eq!(Era::from_name("令和"), Some(Era::Reiwa));
        assert_eq!(Era::from_name("明治"), Some(Era::Meiji));
        assert_eq!(Era::from_name("西暦"), None);
    }

    #[test]
    fn test_era_conversion() {
        assert_eq!(Era::Reiwa.to_gregorian(1), Some(2019));
        assert_eq!(Era::Heisei.to_gregorian(31), Some(2019));
        assert_eq!(Era::Showa.to_gregorian(64), Some(1989));
        assert_eq!(Era::Taisho.to_gregorian(15), Some(1926));
        assert_eq!(Era::Meiji.to_gregorian(45), Some(1912));
        assert_eq!(Era::Reiwa.to_gregorian(i32::MAX), None);
    }
}
