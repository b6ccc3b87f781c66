use multidiff::model::MultidiffModel;
use multidiff::render::Renderer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut model = MultidiffModel::new();
    model.add(b"\x7fELF\x02\x01\x01\x00 build 1041".to_vec(), "v1");
    model.add(b"\x7fELF\x02\x01\x01\x00 build 1042".to_vec(), "v2");
    model.add(b"\x7fELF\x02\x01\x01\x00 build 1042-hotfix".to_vec(), "v3");

    let diffs = model.diff_sequence();
    let renderer = Renderer::from_names("hexdump", "ansi")?;
    for diff in model.diffs() {
        println!(
            "{} -> {}",
            model.object(diff.source)?.name(),
            model.object(diff.target)?.name()
        );
        for op in &diff.opcodes {
            println!("  {op}");
        }
        println!("{}", renderer.render(&model, diff)?);
    }
    println!("diffs computed: {diffs}");
    Ok(())
}
