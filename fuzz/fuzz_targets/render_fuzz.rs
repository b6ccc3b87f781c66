#![no_main]
use libfuzzer_sys::fuzz_target;
use multidiff::model::MultidiffModel;
use multidiff::render::{Encoding, Highlight, RenderOptions, Renderer, Side};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let payload = &data[1..];
    let (source, target) = payload.split_at((data[0] as usize).min(payload.len()));

    let mut model = MultidiffModel::from_datas([source.to_vec(), target.to_vec()]);
    let Ok(diff) = model.diff(0, 1).map(|d| d.clone()) else {
        return;
    };

    for encoding in [Encoding::Hexdump, Encoding::Hex, Encoding::Utf8] {
        for highlight in [Highlight::Ansi, Highlight::Html, Highlight::Plain] {
            let renderer = Renderer::new(RenderOptions {
                encoding,
                highlight,
            });
            for side in [Side::Source, Side::Target] {
                let result = renderer.render_side(&model, &diff, side);
                // Only UTF-8 may fail, and only on undecodable bytes.
                if encoding != Encoding::Utf8 {
                    assert!(result.is_ok());
                }
            }
        }
    }
});
