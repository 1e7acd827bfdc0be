//! Canonicalization of variable codes and region labels.
//!
//! The sensor network exports short variable codes (`P2`, `durP1`) and a
//! handful of inconsistent region labels for the same physical sensors.
//! Both mappings are total: anything not in the alias table passes through
//! unchanged, and applying a mapping twice is the same as applying it once
//! (no canonical name is itself an alias).

/// The canonical variable vocabulary produced by [`canonical_variable`].
pub const CANONICAL_VARIABLES: &[&str] = &[
    "PM2.5",
    "PM10",
    "Humidity",
    "Temperature",
    "Pressure",
    "durPM10",
    "durPM2.5",
    "Noise_Leq",
];

/// Map a raw variable code to its canonical name.
pub fn canonical_variable(raw: &str) -> &str {
    match raw {
        "P2" => "PM2.5",
        "P1" | "P10" => "PM10",
        "humidity" => "Humidity",
        "temperature" => "Temperature",
        "pressure" => "Pressure",
        "durP1" => "durPM10",
        "durP2" => "durPM2.5",
        "noise_Leq" => "Noise_Leq",
        other => other,
    }
}

/// Map alternate sensor/region labels to one canonical region string.
pub fn canonical_region(raw: &str) -> &str {
    match raw {
        "Meru Sensor Mobile 6" | "Meru mobile sensor" => "Meru",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{canonical_region, canonical_variable, CANONICAL_VARIABLES};

    #[test]
    fn test_variable_aliases() {
        assert_eq!(canonical_variable("P2"), "PM2.5");
        assert_eq!(canonical_variable("P1"), "PM10");
        assert_eq!(canonical_variable("P10"), "PM10");
        assert_eq!(canonical_variable("humidity"), "Humidity");
        assert_eq!(canonical_variable("temperature"), "Temperature");
        assert_eq!(canonical_variable("pressure"), "Pressure");
        assert_eq!(canonical_variable("durP1"), "durPM10");
        assert_eq!(canonical_variable("durP2"), "durPM2.5");
        assert_eq!(canonical_variable("noise_Leq"), "Noise_Leq");
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        assert_eq!(canonical_variable("co2"), "co2");
        assert_eq!(canonical_region("Nairobi"), "Nairobi");
    }

    #[test]
    fn test_idempotence() {
        // No canonical name maps to anything but itself
        for name in CANONICAL_VARIABLES {
            assert_eq!(canonical_variable(name), *name);
        }
        assert_eq!(canonical_region("Meru"), "Meru");
        assert_eq!(
            canonical_variable(canonical_variable("P2")),
            canonical_variable("P2")
        );
        assert_eq!(
            canonical_region(canonical_region("Meru mobile sensor")),
            canonical_region("Meru mobile sensor")
        );
    }
}
