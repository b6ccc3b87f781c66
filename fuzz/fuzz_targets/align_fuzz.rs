#![no_main]
use libfuzzer_sys::fuzz_target;
use multidiff::align::{self, AlignOptions, OpKind, opcodes};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte: split point and autojunk toggle.
    let flags = data[0];
    let payload = &data[1..];
    let split = (flags as usize >> 1).min(payload.len());
    let (source, target) = payload.split_at(split);
    let opts = if flags & 1 != 0 {
        AlignOptions::exact()
    } else {
        AlignOptions::default()
    };

    let ops = align::align_with_options(source, target, &opts);
    assert!(opcodes::is_valid_script(&ops, source.len(), target.len()));
    for op in &ops {
        if op.kind == OpKind::Equal {
            assert_eq!(source[op.source_range()], target[op.target_range()]);
        }
    }
});
