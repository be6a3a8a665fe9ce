fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = burrow::runner::run()?;
    std::process::exit(exit_code);
}
