fn main() {
    #[cfg(feature = "cli")]
    multidiff::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("multidiff: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
