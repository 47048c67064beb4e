//! NFL franchise names as schedule pages spell them, mapped to the
//! abbreviations the fantasy platform uses.

pub const TEAMS: [(&str, &str); 32] = [
    ("Arizona Cardinals", "ARI"),
    ("Atlanta Falcons", "ATL"),
    ("Baltimore Ravens", "BAL"),
    ("Buffalo Bills", "BUF"),
    ("Carolina Panthers", "CAR"),
    ("Chicago Bears", "CHI"),
    ("Cincinnati Bengals", "CIN"),
    ("Cleveland Browns", "CLE"),
    ("Dallas Cowboys", "DAL"),
    ("Denver Broncos", "DEN"),
    ("Detroit Lions", "DET"),
    ("Green Bay Packers", "GB"),
    ("Houston Texans", "HOU"),
    ("Indianapolis Colts", "IND"),
    ("Jacksonville Jaguars", "JAX"),
    ("Kansas City Chiefs", "KC"),
    ("Las Vegas Raiders", "LV"),
    ("Los Angeles Chargers", "LAC"),
    ("Los Angeles Rams", "LAR"),
    ("Miami Dolphins", "MIA"),
    ("Minnesota Vikings", "MIN"),
    ("New England Patriots", "NE"),
    ("New Orleans Saints", "NO"),
    ("New York Giants", "NYG"),
    ("New York Jets", "NYJ"),
    ("Philadelphia Eagles", "PHI"),
    ("Pittsburgh Steelers", "PIT"),
    ("San Francisco 49ers", "SF"),
    ("Seattle Seahawks", "SEA"),
    ("Tampa Bay Buccaneers", "TB"),
    ("Tennessee Titans", "TEN"),
    ("Washington Commanders", "WAS"),
];

/// Platform abbreviation for a franchise, from either its full name or an
/// abbreviation already.
pub fn abbreviation(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    TEAMS
        .iter()
        .find(|(full, abbr)| {
            full.eq_ignore_ascii_case(trimmed) || abbr.eq_ignore_ascii_case(trimmed)
        })
        .map(|(_, abbr)| *abbr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_names_resolve() {
        assert_eq!(abbreviation("Kansas City Chiefs"), Some("KC"));
        assert_eq!(abbreviation("  san francisco 49ers "), Some("SF"));
    }

    #[test]
    fn abbreviations_pass_through() {
        assert_eq!(abbreviation("JAX"), Some("JAX"));
        assert_eq!(abbreviation("was"), Some("WAS"));
    }

    #[test]
    fn unknown_names_are_none() {
        assert_eq!(abbreviation("London Monarchs"), None);
        assert_eq!(abbreviation(""), None);
    }
}
