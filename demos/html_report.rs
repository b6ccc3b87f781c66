// Writes a standalone HTML page comparing every file given on the command
// line against the first one.
//
//   cargo run --example html_report -- old.bin new.bin newer.bin > report.html

use multidiff::io::load_files;
use multidiff::model::MultidiffModel;
use multidiff::render::{Renderer, Side};

const STYLE: &str = "\
pre { font-family: monospace; }
.replace { background: #6c8ebf; color: #fff; }
.insert { background: #82b366; color: #fff; }
.delete { background: #b85450; color: #fff; }";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    let mut model = MultidiffModel::new();
    if paths.len() < 2 {
        model.add(
            b"GET /index.html HTTP/1.1\r\nHost: a.example\r\n".to_vec(),
            "request-a",
        );
        model.add(
            b"GET /about.html HTTP/1.1\r\nHost: b.example\r\n".to_vec(),
            "request-b",
        );
    } else {
        load_files(&mut model, &paths)?;
    }

    model.diff_baseline(0)?;
    let renderer = Renderer::from_names("hexdump", "html")?;

    println!("<!DOCTYPE html>\n<html><head><style>\n{STYLE}\n</style></head><body>");
    for diff in model.diffs() {
        let source = model.object(diff.source)?;
        let target = model.object(diff.target)?;
        println!("<h3>{} &rarr; {}</h3>", source.name(), target.name());
        println!(
            "<pre>{}</pre>",
            renderer.render_side(&model, diff, Side::Source)?
        );
        println!("<pre>{}</pre>", renderer.render(&model, diff)?);
    }
    println!("</body></html>");
    Ok(())
}
