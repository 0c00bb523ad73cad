//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::settings::ConfigFile;
use super::ConfigFileError;
use crate::coord::Coordinates;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in
/// the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [backend] section
    if let Some(section) = ini.section(Some("backend")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim().trim_end_matches('/');
            if !v.is_empty() {
                config.backend.base_url = v.to_string();
            }
        }
        if let Some(v) = section.get("timeout_secs") {
            config.backend.timeout_secs = parse_positive(v, "backend", "timeout_secs")?;
        }
    }

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("debounce_ms") {
            config.search.debounce_ms = parse_positive(v, "search", "debounce_ms")?;
        }
        if let Some(v) = section.get("seed_delay_ms") {
            config.search.seed_delay_ms = parse_positive(v, "search", "seed_delay_ms")?;
        }
        if let Some(v) = section.get("seed_enabled") {
            config.search.seed_enabled = parse_bool(v, "search", "seed_enabled")?;
        }
        let lat = section.get("default_lat");
        let lng = section.get("default_lng");
        match (lat, lng) {
            (Some(lat), Some(lng)) => {
                let lat: f64 = lat.parse().map_err(|_| invalid("search", "default_lat", lat))?;
                let lng: f64 = lng.parse().map_err(|_| invalid("search", "default_lng", lng))?;
                config.search.default_center = Coordinates::new(lat, lng).map_err(|e| {
                    ConfigFileError::InvalidValue {
                        section: "search".to_string(),
                        key: "default_lat/default_lng".to_string(),
                        value: format!("{}, {}", lat, lng),
                        reason: e.to_string(),
                    }
                })?;
            }
            (None, None) => {}
            // One without the other would silently shift the viewport
            _ => {
                return Err(ConfigFileError::InvalidValue {
                    section: "search".to_string(),
                    key: "default_lat/default_lng".to_string(),
                    value: String::new(),
                    reason: "both must be set together".to_string(),
                });
            }
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("width") {
            config.map.width = parse_positive(v, "map", "width")?;
        }
        if let Some(v) = section.get("height") {
            config.map.height = parse_positive(v, "map", "height")?;
        }
        if let Some(v) = section.get("output_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.map.output_path = Some(PathBuf::from(v));
            }
        }
        if let Some(v) = section.get("tile_url") {
            let v = v.trim();
            if !v.is_empty() {
                if !v.contains("{z}") || !v.contains("{x}") || !v.contains("{y}") {
                    return Err(ConfigFileError::InvalidValue {
                        section: "map".to_string(),
                        key: "tile_url".to_string(),
                        value: v.to_string(),
                        reason: "must contain {z}, {x} and {y} placeholders".to_string(),
                    });
                }
                config.map.tile_url = Some(v.to_string());
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = Some(PathBuf::from(v));
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "must be a number".to_string(),
    }
}

fn parse_positive<T: std::str::FromStr>(
    value: &str,
    section: &str,
    key: &str,
) -> Result<T, ConfigFileError> {
    value.parse().map_err(|_| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "must be a positive integer".to_string(),
    })
}

fn parse_bool(value: &str, section: &str, key: &str) -> Result<bool, ConfigFileError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).expect("test INI should parse");
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_backend_section() {
        let config = parse(
            "[backend]\n\
             base_url = https://shops.example.com/\n\
             timeout_secs = 30\n",
        )
        .unwrap();
        // Trailing slash is stripped so path joining stays predictable
        assert_eq!(config.backend.base_url, "https://shops.example.com");
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn test_search_section() {
        let config = parse(
            "[search]\n\
             debounce_ms = 500\n\
             seed_enabled = false\n\
             default_lat = 51.5074\n\
             default_lng = -0.1278\n",
        )
        .unwrap();
        assert_eq!(config.search.debounce_ms, 500);
        assert!(!config.search.seed_enabled);
        assert_eq!(config.search.default_center.lat, 51.5074);
        assert_eq!(config.search.default_center.lng, -0.1278);
    }

    #[test]
    fn test_lat_without_lng_is_error() {
        let result = parse("[search]\ndefault_lat = 51.5\n");
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_out_of_range_center_is_error() {
        let result = parse("[search]\ndefault_lat = 95.0\ndefault_lng = 0.0\n");
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_debounce_is_error() {
        let result = parse("[search]\ndebounce_ms = fast\n");
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_map_section() {
        let config = parse(
            "[map]\n\
             width = 1024\n\
             height = 768\n\
             output_path = /tmp/map.png\n\
             tile_url = https://tiles.example.com/{z}/{x}/{y}.png\n",
        )
        .unwrap();
        assert_eq!(config.map.width, 1024);
        assert_eq!(config.map.height, 768);
        assert_eq!(config.map.output_path, Some(PathBuf::from("/tmp/map.png")));
        assert!(config.map.tile_url.unwrap().contains("{z}"));
    }

    #[test]
    fn test_tile_url_without_placeholders_is_error() {
        let result = parse("[map]\ntile_url = https://tiles.example.com/fixed.png\n");
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let config = parse("[future]\nnew_key = value\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
