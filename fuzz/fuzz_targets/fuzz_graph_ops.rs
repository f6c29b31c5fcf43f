// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use dio_curator::document::Document;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Create { parent: Option<u8> },
    Move { term: u8, parent: Option<u8> },
    Remove { term: u8 },
    Map { term: u8, image: u8 },
}

fn id(n: u8) -> String {
    format!("DIO:{:07}", u32::from(n) + 1)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut document = Document::new();
    for op in ops {
        match op {
            Op::Create { parent } => {
                let parent = parent.map(id);
                let _ = document.create_term("t", "", parent.as_deref());
            }
            Op::Move { term, parent } => {
                let parent = parent.map(id);
                document.move_term(&id(term), parent.as_deref());
            }
            Op::Remove { term } => {
                if let Ok(removal) = document.remove_term(&id(term)) {
                    for gone in &removal.terms {
                        assert!(document.mappings_for_term(gone.as_str()).is_empty());
                    }
                }
            }
            Op::Map { term, image } => {
                if let Ok(dio_id) = dio_curator::types::TermId::parse(&id(term)) {
                    document.add_mapping(dio_id, &format!("image-{image}"));
                }
            }
        }
        assert!(document.graph().is_acyclic());
    }
});
