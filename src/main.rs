fn main() -> anyhow::Result<()> {
    tabhop::cli::run()
}
