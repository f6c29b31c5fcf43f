// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use dio_curator::obo::parse_hierarchy;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let graph = parse_hierarchy(data);
    assert!(graph.is_acyclic());
    let first = graph.serialize();
    assert_eq!(parse_hierarchy(&first).serialize(), first);
});
