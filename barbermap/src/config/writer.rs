//! Serialization of `ConfigFile` → INI text.
//!
//! Hand-written rather than going through `Ini` so the output carries
//! comments and stable section ordering.

use super::settings::ConfigFile;

/// Render a `ConfigFile` as a commented INI string.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let mut out = String::new();

    out.push_str("# barbermap configuration\n");
    out.push_str("# Values not present fall back to built-in defaults.\n\n");

    out.push_str("[backend]\n");
    out.push_str(&format!("base_url = {}\n", config.backend.base_url));
    out.push_str(&format!("timeout_secs = {}\n\n", config.backend.timeout_secs));

    out.push_str("[search]\n");
    out.push_str(&format!("debounce_ms = {}\n", config.search.debounce_ms));
    out.push_str(&format!("seed_delay_ms = {}\n", config.search.seed_delay_ms));
    out.push_str(&format!("seed_enabled = {}\n", config.search.seed_enabled));
    out.push_str(&format!(
        "default_lat = {}\n",
        config.search.default_center.lat
    ));
    out.push_str(&format!(
        "default_lng = {}\n\n",
        config.search.default_center.lng
    ));

    out.push_str("[map]\n");
    out.push_str(&format!("width = {}\n", config.map.width));
    out.push_str(&format!("height = {}\n", config.map.height));
    if let Some(path) = &config.map.output_path {
        out.push_str(&format!("output_path = {}\n", path.display()));
    }
    if let Some(url) = &config.map.tile_url {
        out.push_str(&format!("tile_url = {}\n", url));
    }
    out.push('\n');

    out.push_str("[logging]\n");
    if let Some(dir) = &config.logging.directory {
        out.push_str(&format!("directory = {}\n", dir.display()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_ini;
    use ini::Ini;
    use std::path::PathBuf;

    #[test]
    fn test_round_trips_through_parser() {
        let mut config = ConfigFile::default();
        config.backend.base_url = "https://shops.example.com".to_string();
        config.search.debounce_ms = 500;
        config.search.seed_enabled = false;
        config.map.output_path = Some(PathBuf::from("/tmp/map.png"));

        let text = to_config_string(&config);
        let ini = Ini::load_from_str(&text).expect("writer output should parse");
        let parsed = parse_ini(&ini).expect("writer output should validate");

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_optional_keys_omitted_when_unset() {
        let text = to_config_string(&ConfigFile::default());
        assert!(!text.contains("output_path"));
        assert!(!text.contains("tile_url"));
        assert!(!text.contains("directory"));
    }
}
