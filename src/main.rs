fn main() {
    #[cfg(feature = "cli")]
    oxibocu::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("oxibocu: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
