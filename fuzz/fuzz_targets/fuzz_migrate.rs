// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use grapher_config::schema::{is_latest, migrate_to_latest, DetectedSchema};
use grapher_config::types::parse_config;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = parse_config(text) else {
        return;
    };
    let known = matches!(
        grapher_config::schema::detect_version(&config),
        Ok(DetectedSchema::Known(_))
    );
    if let Ok(migrated) = migrate_to_latest(&config) {
        if known {
            assert!(is_latest(&migrated));
        }
        assert_eq!(migrate_to_latest(&migrated).ok(), Some(migrated));
    }
});
