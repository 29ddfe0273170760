use learn_tracker::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    Cli::run()
}
