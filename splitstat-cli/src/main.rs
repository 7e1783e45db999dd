fn main() -> anyhow::Result<()> {
    splitstat_cli::run()
}
