use placemap_core::{Categories, Place, Points};

use super::*;
use crate::commands::format_place;

#[test]
fn parses_search_with_query() {
    let cli = Cli::try_parse_from(["placemap", "search", "Amsterdam"]).expect("valid cli args");

    assert!(matches!(cli.command, Commands::Search { query } if query == "Amsterdam"));
}

#[test]
fn search_requires_query() {
    assert!(Cli::try_parse_from(["placemap", "search"]).is_err());
}

#[test]
fn parses_places_command() {
    let cli = Cli::try_parse_from(["placemap", "places"]).expect("valid cli args");

    assert!(matches!(cli.command, Commands::Places));
}

#[test]
fn explore_debounce_defaults_to_config() {
    let cli = Cli::try_parse_from(["placemap", "explore"]).expect("valid cli args");

    assert!(matches!(cli.command, Commands::Explore { debounce_ms: None }));
}

#[test]
fn explore_accepts_debounce_override() {
    let cli = Cli::try_parse_from(["placemap", "explore", "--debounce-ms", "50"])
        .expect("valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Explore {
            debounce_ms: Some(50)
        }
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["placemap"]).is_err());
}

#[test]
fn format_place_is_tab_separated() {
    let place = Place {
        name: Some("Amsterdam".to_string()),
        location_name: Some("Amsterdam, NH, Netherlands".to_string()),
        category: Categories::from(vec!["populated_place".to_string(), "political".to_string()]),
        points: Points::point(52.372_759_8, 4.893_604, "51d1"),
    };

    assert_eq!(
        format_place(&place),
        "51d1\tAmsterdam\t52.372760,4.893604\tpopulated_place,political"
    );
}

#[test]
fn format_place_without_name_uses_dash() {
    let place = Place {
        name: None,
        location_name: None,
        category: Categories::unknown(),
        points: Points::point(0.0, 0.0, "x"),
    };

    assert_eq!(format_place(&place), "x\t-\t0.000000,0.000000\tunknown");
}
