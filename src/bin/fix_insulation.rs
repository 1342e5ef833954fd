use pzkit::{cli, insulation, logging};

fn main() -> anyhow::Result<()> {
    let args = cli::parse_insulation();
    logging::init(args.verbosity);
    insulation::run(&args)?;
    Ok(())
}
