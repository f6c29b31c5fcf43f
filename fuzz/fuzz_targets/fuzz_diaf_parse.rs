// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use dio_curator::mapping::parse_mappings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let table = parse_mappings(data);
    let text = table.serialize();
    assert_eq!(parse_mappings(&text).serialize(), text);
});
