use rand::seq::SliceRandom;

/// Avatar colors a new account can be assigned.
pub const PROFILE_COLORS: [&str; 19] = [
    "black",
    "dark-gray",
    "dark-red",
    "red",
    "purple",
    "dark-pink",
    "dark-green",
    "green",
    "dark-blue",
    "navy",
    "light-gray",
    "white",
    "orange",
    "yellow",
    "pink",
    "light-pink",
    "light-green",
    "blue",
    "light-blue",
];

/// First letter of the first, middle (when present and non-empty) and last names.
pub fn derive_initials(f_name: &str, m_name: Option<&str>, l_name: &str) -> String {
    [Some(f_name), m_name, Some(l_name)]
        .into_iter()
        .flatten()
        .filter_map(|name| name.trim().chars().next())
        .collect()
}

pub fn random_profile_color() -> &'static str {
    PROFILE_COLORS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PROFILE_COLORS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_with_middle_name() {
        assert_eq!(derive_initials("Billy", Some("Joe"), "Bob"), "BJB");
    }

    #[test]
    fn initials_without_middle_name() {
        assert_eq!(derive_initials("Alice", None, "Alphabet"), "AA");
    }

    #[test]
    fn empty_middle_name_contributes_nothing() {
        assert_eq!(derive_initials("Cindy", Some(""), "Cypress"), "CC");
    }

    #[test]
    fn initials_take_first_char_not_byte() {
        assert_eq!(derive_initials("Émile", None, "Zola"), "ÉZ");
    }

    #[test]
    fn random_color_comes_from_palette() {
        for _ in 0..50 {
            assert!(PROFILE_COLORS.contains(&random_profile_color()));
        }
    }
}
