// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use grapher_config::patch::{diff_values, merge_values};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|input: (&str, &str)| {
    let (Ok(full), Ok(parent)) = (
        serde_json::from_str::<Value>(input.0),
        serde_json::from_str::<Value>(input.1),
    ) else {
        return;
    };
    let Ok(patch) = diff_values(&full, &parent, &[]) else {
        return;
    };
    let merged = merge_values(&parent, &patch).expect("patch is an object");
    // Diffing the merged config again must find nothing new
    let again = diff_values(&full, &merged, &[]).expect("both are objects");
    assert_eq!(again, Value::Object(Default::default()));
});
